pub const QUESTION_JSON_EXAMPLE: &str = r#"```json
[
  {
    "text": "Question text",
    "type": "multiple_choice",
    "options": [
      {"text": "Option A", "isCorrect": false},
      {"text": "Option B", "isCorrect": true},
      {"text": "Option C", "isCorrect": false},
      {"text": "Option D", "isCorrect": false}
    ],
    "points": 3,
    "explanation": "Why the correct option is correct"
  }
]
```"#;

pub const TITLE_JSON_EXAMPLE: &str = r#"```json
{
  "title": "Professional, exam-focused title",
  "description": "Description of the practice test"
}
```"#;

pub const PROCESSOR_JSON_EXAMPLE: &str = r#"```json
[
  {
    "text": "Clear, well-phrased question",
    "type": "multiple_choice|true_false|short_answer|essay",
    "options": [
      {"text": "Option 1", "isCorrect": false},
      {"text": "Option 2", "isCorrect": true},
      {"text": "Option 3", "isCorrect": false}
    ],
    "points": 1,
    "explanation": "Clear explanation of why the answer is correct"
  }
]
```"#;

pub const FENCED_ONLY_RULE: &str = "Respond with ONLY the ```json fenced code block. No text before the opening fence and no text after the closing fence.";

pub const GENERIC_FALLBACK_TITLE: &str = "Knowledge Quiz";
pub const GENERIC_FALLBACK_DESCRIPTION: &str =
    "Test your knowledge with these carefully crafted questions";

pub const QUESTION_PROCESSOR_PROMPT: &str = "You are an expert question processor. Analyze the given questions and convert them into a structured JSON format.

For each question:
1. Rephrase the question clearly and concisely if needed
2. Determine the question type (multiple_choice, true_false, short_answer, or essay)
3. Generate appropriate options for multiple choice and true/false questions
4. Assign points from 1 to 5 based on difficulty
5. Provide a clear explanation for the correct answer

Guidelines:
- multiple_choice: 3-4 options with exactly one correct answer
- true_false: exactly 2 options (True/False) with exactly one correct answer
- short_answer and essay: \"options\" is an empty array []
- Explanations should be educational and informative";
