pub mod assess_response_use_case;
pub mod generate_questions_use_case;
