// Fixed user-turn phrasing that accompanies each system template.
// System templates live in the YAML file; these wrappers do not.

pub fn first_question(max_questions: usize) -> String {
    format!("Generate question 1 of {max_questions} technical interview questions.")
}

pub fn next_question(question_number: usize, max_questions: usize) -> String {
    format!(
        "Generate question {question_number} of {max_questions}. Make it different from previous \
        questions and relevant to the candidate's profile and previous answers."
    )
}

pub fn question_turn(instruction: &str) -> String {
    format!("Answer: {instruction}")
}

pub fn reference_turn(question: &str) -> String {
    format!("Question: {question}")
}

pub fn analysis_turn(answer: &str) -> String {
    format!("Answer: {answer}")
}

pub fn scoring_turn(answer: &str) -> String {
    format!("user_answer: {answer}")
}

pub fn completion_notice(max_questions: usize) -> String {
    format!(
        "Congratulations! You have successfully completed all {max_questions} questions. \
        Your interview is now complete."
    )
}
