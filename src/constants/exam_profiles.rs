use crate::models::domain::exam_profile::ExamProfile;

const POSTGRADUATE_LEVEL: &str = "Questions must be at POSTGRADUATE/MASTERS level difficulty. Focus on CONCEPTUAL UNDERSTANDING, APPLICATION and REASONING rather than factual recall, and avoid simple definition-based questions.";

const UNDERGRADUATE_LEVEL: &str = "Questions must be at UNDERGRADUATE/DEGREE level difficulty. Test FUNDAMENTAL concepts and facts with some analysis and reasoning, and avoid overly theoretical or postgraduate material.";

pub const BUILTIN_EXAM_PROFILES: &[ExamProfile] = &[
    ExamProfile {
        key: "jkpsc",
        name: "JKPSC 10+2 Lecturer Recruitment",
        difficulty: "Advanced/Postgraduate Level",
        description: "Questions focus on conceptual understanding, analysis, and evaluation at postgraduate level.",
        level_directive: POSTGRADUATE_LEVEL,
        focus_areas: &[
            "Application of concepts to new situations",
            "Numerical problems requiring multi-step calculations",
            "Analysis of experimental data or scenarios",
            "Comparison and contrast of related concepts",
            "Critical evaluation of statements or hypotheses",
        ],
        time_per_question: "2-3 minutes",
        min_points: 2,
        max_points: 4,
        fallback_title: "JKPSC 10+2 Lecturer Recruitment - Advanced Practice Test",
        fallback_description: "Comprehensive practice test for JKPSC 10+2 Lecturer Recruitment covering {count} key topics. Features postgraduate-level MCQs designed to test conceptual understanding, analytical thinking, and application of knowledge as per JKPSC examination standards.",
    },
    ExamProfile {
        key: "jkpsc_political_science",
        name: "JKPSC 10+2 Lecturer Recruitment - Political Science",
        difficulty: "Advanced/Postgraduate Level",
        description: "Advanced Political Science questions focusing on theories, institutions, processes, and critical analysis at postgraduate level.",
        level_directive: POSTGRADUATE_LEVEL,
        focus_areas: &[
            "Application of political theories to contemporary and global contexts",
            "Critical evaluation of statements, arguments, or hypotheses",
            "Interpretation of political philosophies and their practical implications",
            "Historic dates and scholars' views",
            "Integration of multiple concepts across topics",
        ],
        time_per_question: "2-3 minutes",
        min_points: 2,
        max_points: 4,
        fallback_title: "JKPSC 10+2 Lecturer Recruitment - Political Science Advanced Practice Test",
        fallback_description: "Comprehensive practice test for JKPSC 10+2 Lecturer Recruitment in Political Science covering {count} key areas. Features postgraduate-level MCQs designed to test conceptual understanding, critical analysis, and application of political knowledge as per JKPSC examination standards.",
    },
    ExamProfile {
        key: "jkpsc_chemistry",
        name: "JKPSC 10+2 Lecturer Recruitment (Chemistry)",
        difficulty: "Advanced/Postgraduate Level",
        description: "Advanced Chemistry questions covering physical, organic, inorganic, and analytical chemistry at postgraduate level.",
        level_directive: POSTGRADUATE_LEVEL,
        focus_areas: &[
            "Reaction mechanisms and stereochemistry",
            "Thermodynamics and kinetics numericals",
            "Coordination chemistry and spectroscopy",
            "Interpretation of analytical and experimental data",
            "Integration of physical, organic and inorganic concepts",
        ],
        time_per_question: "2-3 minutes",
        min_points: 2,
        max_points: 4,
        fallback_title: "JKPSC 10+2 Lecturer Recruitment (Chemistry) - Advanced Practice Test",
        fallback_description: "Comprehensive Chemistry practice test for JKPSC 10+2 Lecturer Recruitment covering {count} key topics. Features postgraduate-level Chemistry MCQs designed to test conceptual understanding, problem-solving, and analytical reasoning as per JKPSC standards.",
    },
    ExamProfile {
        key: "jkpsc_junior_assistant",
        name: "JKPSC Junior Assistant Recruitment",
        difficulty: "Medium/Undergraduate Level",
        description: "Questions focus on general knowledge, reasoning, basic mathematics, English, and computer awareness at undergraduate level.",
        level_directive: UNDERGRADUATE_LEVEL,
        focus_areas: &[
            "General knowledge and reasoning",
            "Basic mathematics and arithmetic applications",
            "English grammar and comprehension",
            "Computer awareness (MS Office, basics of IT)",
            "General awareness (Indian polity, history, geography, economy)",
        ],
        time_per_question: "1-2 minutes",
        min_points: 1,
        max_points: 2,
        fallback_title: "JKPSC Junior Assistant Recruitment - Medium Level Practice Test",
        fallback_description: "Comprehensive practice test for JKPSC Junior Assistant Recruitment covering {count} important topics. Features medium-level MCQs designed to test reasoning, English, mathematics, computer awareness, and general knowledge in line with JKPSC standards.",
    },
    ExamProfile {
        key: "jkssb_junior_assistant",
        name: "JKSSB Junior Assistant",
        difficulty: "Undergraduate Level",
        description: "General knowledge, basic concepts and practical application for clerical and administrative roles.",
        level_directive: UNDERGRADUATE_LEVEL,
        focus_areas: &[
            "Factual recall (important dates, names, definitions)",
            "Basic conceptual understanding",
            "Everyday application of knowledge",
            "Simple problem-solving",
            "Idioms, phrases and statement-based questions",
        ],
        time_per_question: "60-120 seconds",
        min_points: 1,
        max_points: 2,
        fallback_title: "JKSSB Junior Assistant - Undergraduate Practice Test",
        fallback_description: "Comprehensive practice test for JKSSB Junior Assistant Exam covering {count} key topics. Features undergraduate-level MCQs designed to test general knowledge, basic conceptual understanding, and practical application as per JKSSB examination standards.",
    },
    ExamProfile {
        key: "neet",
        name: "NEET (National Eligibility cum Entrance Test)",
        difficulty: "Intermediate/Pre-Medical Level",
        description: "NCERT-based questions testing fundamental concepts for medical entrance.",
        level_directive: "Questions must match Class 11-12 NCERT syllabus depth for medical entrance. Emphasise conceptual clarity, diagram and data interpretation, and quick application.",
        focus_areas: &[
            "NCERT-based conceptual questions",
            "Assertion-reason style statements",
            "Diagram and data interpretation",
            "Single-step numericals",
            "Biological processes and their regulation",
        ],
        time_per_question: "1 minute",
        min_points: 1,
        max_points: 5,
        fallback_title: "NEET Practice Test - Medical Entrance Preparation",
        fallback_description: "Comprehensive NEET practice test covering {count} essential topics. Features Class 11-12 level MCQs based on NCERT syllabus, designed for medical entrance preparation with focus on conceptual understanding and problem-solving skills.",
    },
    ExamProfile {
        key: "jee",
        name: "JEE (Joint Entrance Examination)",
        difficulty: "Advanced/Engineering Level",
        description: "Complex problem-solving questions requiring mathematical rigor and analytical thinking.",
        level_directive: "Questions must be at engineering entrance level. Require multi-step problem solving, mathematical rigour and integration of physics, chemistry and mathematics concepts.",
        focus_areas: &[
            "Multi-concept numerical problems",
            "Analytical reasoning with graphs and functions",
            "Application of physical laws to unfamiliar setups",
            "Mechanism-based chemistry reasoning",
            "Proof-style mathematical reasoning",
        ],
        time_per_question: "2-3 minutes",
        min_points: 1,
        max_points: 5,
        fallback_title: "JEE Practice Test - Engineering Entrance Preparation",
        fallback_description: "Comprehensive JEE practice test covering {count} key topics. Features advanced-level MCQs designed for engineering entrance preparation with emphasis on problem-solving, analytical thinking, and mathematical rigor.",
    },
    ExamProfile {
        key: "upsc",
        name: "UPSC Civil Services Examination",
        difficulty: "Advanced/Administrative Level",
        description: "Questions integrating theory with governance, policy analysis, and current affairs.",
        level_directive: "Questions must be at graduate level for civil services preparation. Integrate static theory with governance, policy analysis and current affairs, using statement-based formats where suitable.",
        focus_areas: &[
            "Statement-based multiple statement questions",
            "Policy and governance analysis",
            "Constitutional provisions and their application",
            "Economic and social development issues",
            "Current affairs linked to static topics",
        ],
        time_per_question: "1-2 minutes",
        min_points: 1,
        max_points: 5,
        fallback_title: "UPSC Civil Services Practice Test",
        fallback_description: "Comprehensive UPSC Civil Services practice test covering {count} important topics. Features graduate-level MCQs designed for administrative services preparation with focus on analytical thinking, policy understanding, and current affairs integration.",
    },
];
