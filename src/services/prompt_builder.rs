use crate::{
    constants::prompts::{
        PROCESSOR_JSON_EXAMPLE, QUESTION_JSON_EXAMPLE, QUESTION_PROCESSOR_PROMPT,
        TITLE_JSON_EXAMPLE,
    },
    models::domain::{exam_profile::ExamProfile, TopicList},
};

/// Standard generation prompt for `count` questions on `topic`.
pub fn build_question_prompt(profile: &ExamProfile, topic: &str, count: u32) -> String {
    let focus = profile
        .focus_areas
        .iter()
        .map(|area| format!("- {}", area))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert in creating questions for the {name}. Generate {count} Multiple Choice Questions (MCQs) on the topic: \"{topic}\"

IMPORTANT REQUIREMENTS:
1. {level}
2. Each question must have exactly 4 options with exactly ONE correct answer
3. Options must be plausible so the correct answer is not obvious
4. Provide a clear, educational explanation for the correct answer

QUESTION TYPES TO INCLUDE:
{focus}

FORMAT: Respond with a JSON array in this exact format:
{example}

DIFFICULTY GUIDELINES:
- Points: {points} per question (difficulty: {difficulty})
- Each question should take about {time} of thinking time

Topic: {topic}
Generate {count} high-quality {name} MCQs now. Respond only with the JSON array wrapped in ```json``` code blocks.",
        name = profile.name,
        count = count,
        topic = topic,
        level = profile.level_directive,
        focus = focus,
        example = QUESTION_JSON_EXAMPLE,
        points = profile.points_label(),
        difficulty = profile.difficulty,
        time = profile.time_per_question,
    )
}

pub fn build_title_prompt(profile: &ExamProfile, topics: &TopicList) -> String {
    format!(
        "Generate a professional title and description for a {name} practice test covering these topics:
Topics: {topics}

The test should reflect:
- {difficulty} difficulty
- {name} examination standards
- {description}

Respond with JSON:
{example}
Respond only with the JSON object wrapped in ```json``` code blocks.",
        name = profile.name,
        topics = topics.joined(", "),
        difficulty = profile.difficulty,
        description = profile.description,
        example = TITLE_JSON_EXAMPLE,
    )
}

pub fn build_processor_prompt(questions_text: &str) -> String {
    format!(
        "{instructions}

Input Questions:
{questions}

Respond with a JSON array in this exact format:
{example}

Respond only with the JSON array, wrapped in ```json code blocks.",
        instructions = QUESTION_PROCESSOR_PROMPT,
        questions = questions_text,
        example = PROCESSOR_JSON_EXAMPLE,
    )
}

pub fn build_processor_title_prompt(question_texts: &[String]) -> String {
    format!(
        "Based on these questions, generate a catchy title and engaging description:

Questions:
{questions}

Make the title creative and the description informative but concise.
Respond with JSON:
{example}
Respond only with the JSON object, wrapped in ```json code blocks.",
        questions = question_texts.join("\n"),
        example = TITLE_JSON_EXAMPLE,
    )
}
