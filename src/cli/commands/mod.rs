pub mod prompts;
pub mod themes;
pub mod use_cases;

#[cfg(test)]
#[path = "prompts_test.rs"]
mod prompts_test;
