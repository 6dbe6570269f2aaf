use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraderMode {
    Individual,
    Class,
}

impl GraderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GraderMode::Individual => "individual",
            GraderMode::Class => "class",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "individual" => Some(GraderMode::Individual),
            "class" => Some(GraderMode::Class),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraderStep {
    NamePending,
    CountPending,
    ItemsPending,
    Saved,
}

impl GraderStep {
    pub fn as_str(self) -> &'static str {
        match self {
            GraderStep::NamePending => "namePending",
            GraderStep::CountPending => "countPending",
            GraderStep::ItemsPending => "itemsPending",
            GraderStep::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub message: String,
}

/// One workflow instance of the form controller. Input advances
/// `NamePending -> CountPending -> ItemsPending -> Saved`; `clear` drops
/// back to `NamePending` from anywhere, discarding uncommitted input
/// only. Handlers gate every step on `expect_step` before committing
/// anything, so out-of-order input is refused, never applied partially.
#[derive(Debug)]
pub struct GraderSession {
    pub id: String,
    pub mode: GraderMode,
    pub step: GraderStep,
    pub name: Option<String>,
    pub slots: Option<usize>,
}

impl GraderSession {
    pub fn new(mode: GraderMode) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mode,
            step: GraderStep::NamePending,
            name: None,
            slots: None,
        }
    }

    pub fn expect_step(&self, expected: GraderStep) -> Result<(), StepError> {
        if self.step == expected {
            return Ok(());
        }
        let message = match (expected, self.step) {
            (_, GraderStep::Saved) => "already saved; restart or clear to begin again",
            (GraderStep::NamePending, _) => "a name was already entered; clear to start over",
            (GraderStep::CountPending, GraderStep::NamePending)
            | (GraderStep::ItemsPending, GraderStep::NamePending) => "enter a name first",
            (GraderStep::CountPending, _) => "a count was already entered; clear to change it",
            (GraderStep::ItemsPending, _) => "enter a count first",
            (GraderStep::Saved, _) => "nothing has been saved yet",
        };
        Err(StepError {
            message: message.to_string(),
        })
    }

    /// Caller has validated and committed the name; advance to the count.
    pub fn accept_name(&mut self, name: String) {
        self.name = Some(name);
        self.step = GraderStep::CountPending;
    }

    pub fn accept_count(&mut self, count: usize) {
        self.slots = Some(count);
        self.step = GraderStep::ItemsPending;
    }

    /// The entered name, available from `CountPending` onward.
    pub fn entered_name(&self) -> Result<&str, StepError> {
        match self.name.as_deref() {
            Some(name) => Ok(name),
            None => Err(StepError {
                message: "enter a name first".to_string(),
            }),
        }
    }

    /// How many item fields a save must fill. Only valid on `ItemsPending`.
    pub fn expected_slots(&self) -> Result<usize, StepError> {
        self.expect_step(GraderStep::ItemsPending)?;
        Ok(self.slots.unwrap_or(0))
    }

    pub fn mark_saved(&mut self) {
        self.step = GraderStep::Saved;
    }

    /// Discards all uncommitted input. Records already committed to the
    /// store stay committed.
    pub fn clear(&mut self) {
        self.step = GraderStep::NamePending;
        self.name = None;
        self.slots = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_in_order() {
        let mut session = GraderSession::new(GraderMode::Individual);
        assert_eq!(session.step, GraderStep::NamePending);
        session.expect_step(GraderStep::NamePending).expect("fresh");
        session.accept_name("Ann".to_string());
        assert_eq!(session.step, GraderStep::CountPending);
        session.accept_count(3);
        assert_eq!(session.step, GraderStep::ItemsPending);
        assert_eq!(session.expected_slots().expect("slots"), 3);
        session.mark_saved();
        assert_eq!(session.step, GraderStep::Saved);
    }

    #[test]
    fn count_before_name_is_refused() {
        let session = GraderSession::new(GraderMode::Class);
        let err = session
            .expect_step(GraderStep::CountPending)
            .expect_err("out of order");
        assert_eq!(err.message, "enter a name first");
    }

    #[test]
    fn save_before_count_is_refused() {
        let mut session = GraderSession::new(GraderMode::Individual);
        session.accept_name("Ann".to_string());
        let err = session.expected_slots().expect_err("out of order");
        assert_eq!(err.message, "enter a count first");
    }

    #[test]
    fn second_name_is_refused_until_clear() {
        let mut session = GraderSession::new(GraderMode::Individual);
        session.accept_name("Ann".to_string());
        assert!(session.expect_step(GraderStep::NamePending).is_err());
        session.clear();
        session.expect_step(GraderStep::NamePending).expect("after clear");
    }

    #[test]
    fn saved_is_terminal_until_clear() {
        let mut session = GraderSession::new(GraderMode::Class);
        session.accept_name("Math".to_string());
        session.accept_count(1);
        session.mark_saved();
        let err = session.expected_slots().expect_err("terminal");
        assert_eq!(err.message, "already saved; restart or clear to begin again");
        session.clear();
        assert_eq!(session.step, GraderStep::NamePending);
        assert_eq!(session.name, None);
        assert_eq!(session.slots, None);
    }

    #[test]
    fn mode_strings_round_trip() {
        assert_eq!(GraderMode::parse("individual"), Some(GraderMode::Individual));
        assert_eq!(GraderMode::parse("class"), Some(GraderMode::Class));
        assert_eq!(GraderMode::parse("batch"), None);
        assert_eq!(GraderMode::Class.as_str(), "class");
        assert_eq!(GraderStep::ItemsPending.as_str(), "itemsPending");
    }
}
