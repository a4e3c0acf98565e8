#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Victory => "¡Ganaste!",
            Outcome::Defeat => "¡Se acabó el tiempo!",
        }
    }

    pub fn sub_message(self) -> &'static str {
        match self {
            Outcome::Victory => "¡Pulsa F5 para volver a jugar e intentar romper tu marca!",
            Outcome::Defeat => "Pulsa F5 para volver a jugar",
        }
    }
}

/// What the result page shows, frozen at the moment the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,
    pub correct_pairs: u32,
    pub attempts: u32,
    pub seconds_remaining: u32,
}

impl Summary {
    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            ("Aciertos", self.correct_pairs.to_string()),
            ("Intentos", self.attempts.to_string()),
            ("Segundos restantes", self.seconds_remaining.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_display_order() {
        let summary = Summary {
            outcome: Outcome::Victory,
            correct_pairs: 8,
            attempts: 13,
            seconds_remaining: 21,
        };
        let rows = summary.rows();
        assert_eq!(rows[0], ("Aciertos", "8".to_string()));
        assert_eq!(rows[1], ("Intentos", "13".to_string()));
        assert_eq!(rows[2], ("Segundos restantes", "21".to_string()));
        assert_eq!(summary.outcome.message(), "¡Ganaste!");
    }
}
