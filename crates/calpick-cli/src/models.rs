use serde::Serialize;

/// One line of `calpick labels` output
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DayLabel {
    pub date: String,
    pub events: usize,
    pub label: String,
}

impl DayLabel {
    pub fn to_line(&self) -> String {
        format!("{}  {}", self.date, self.label)
    }
}
