use strum::EnumIter;

/// Aggregation window reported under `connectionsStat`.
#[derive(Debug, Clone, Copy, EnumIter, PartialEq, Eq, Hash)]
pub enum Window {
    Hour,
    Day,
    Week,
    Month,
}

/// Whether the connections were opened for editing or viewing.
#[derive(Debug, Clone, Copy, EnumIter, PartialEq, Eq, Hash)]
pub enum Mode {
    Edit,
    View,
}

/// Statistic reported for each window and mode, exported as the `type` label.
#[derive(Debug, Clone, Copy, EnumIter, PartialEq, Eq, Hash)]
pub enum Statistic {
    Min,
    Avr,
    Max,
}

impl Window {
    pub const COUNT: usize = 4;

    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Hour => "hour",
            Window::Day => "day",
            Window::Week => "week",
            Window::Month => "month",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Edit => "edit",
            Mode::View => "view",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Min => "min",
            Statistic::Avr => "avr",
            Statistic::Max => "max",
        }
    }
}
