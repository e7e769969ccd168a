use crate::foundation::error::{HeartlineError, HeartlineResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct: usize,
}

impl QuizQuestion {
    fn new(prompt: &str, options: [&str; 4], correct: usize) -> Self {
        Self {
            prompt: prompt.to_owned(),
            options: options.iter().map(|s| (*s).to_owned()).collect(),
            correct,
        }
    }

    pub fn validate(&self, index: usize) -> HeartlineResult<()> {
        if self.options.is_empty() {
            return Err(HeartlineError::validation(format!(
                "quiz question {index} has no options"
            )));
        }
        if self.correct >= self.options.len() {
            return Err(HeartlineError::validation(format!(
                "quiz question {index}: correct answer {} out of range",
                self.correct
            )));
        }
        Ok(())
    }
}

pub fn default_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new(
            "Where did we first meet?",
            ["At a café", "At the park", "Through friends", "At work"],
            1,
        ),
        QuizQuestion::new(
            "What was our first date?",
            ["Dinner and movie", "Ice Cream date", "Beach walk", "Concert"],
            1,
        ),
        QuizQuestion::new(
            "What's my favorite thing about you?",
            ["Your smile", "Your laugh", "Your heart", "Everything"],
            3,
        ),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// An answer is already pending, or the quiz is over.
    Ignored,
}

/// Three-question toy quiz: answer, wait, advance; score shown at the end.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Quiz {
    #[serde(skip)]
    questions: Vec<QuizQuestion>,
    current: usize,
    score: usize,
    selected: Option<usize>,
    finished: bool,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
            selected: None,
            finished: false,
        }
    }

    /// Record `option` for the current question. The caller schedules
    /// [`advance`](Self::advance) unless the answer was ignored.
    pub fn answer(&mut self, option: usize) -> HeartlineResult<AnswerOutcome> {
        if self.finished || self.selected.is_some() {
            return Ok(AnswerOutcome::Ignored);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Ok(AnswerOutcome::Ignored);
        };
        if option >= question.options.len() {
            return Err(HeartlineError::validation(format!(
                "quiz option {option} out of range (question has {})",
                question.options.len()
            )));
        }
        self.selected = Some(option);
        if option == question.correct {
            self.score += 1;
            Ok(AnswerOutcome::Correct)
        } else {
            Ok(AnswerOutcome::Incorrect)
        }
    }

    /// Move past the answered question, or finish after the last one.
    pub fn advance(&mut self) {
        if self.selected.is_none() || self.finished {
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
        } else {
            self.finished = true;
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.score = 0;
        self.selected = None;
        self.finished = false;
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/quiz.rs"]
mod tests;
