//! The edge cost attribute used for shortest-path computation.

/// Which road attribute is minimised when looking for the closest
/// destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighing {
    /// Road length in metres.
    #[default]
    Distance,
    /// Travel time in seconds.
    Time,
}

impl Weighing {
    /// Column label, as used in route tables and summary headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Weighing::Distance => "distance",
            Weighing::Time     => "time",
        }
    }
}

impl std::fmt::Display for Weighing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Weighing {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "length" => Ok(Weighing::Distance),
            "time"                => Ok(Weighing::Time),
            other => Err(crate::CoreError::Parse(format!(
                "unknown weighing {other:?}: expected \"distance\" or \"time\""
            ))),
        }
    }
}
