pub mod rubric;
pub mod score;
