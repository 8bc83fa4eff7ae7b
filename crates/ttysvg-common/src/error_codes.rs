pub const INPUT_NOT_FOUND: i32 = -32001;
pub const INPUT_UNREADABLE: i32 = -32002;

pub const INVALID_CONFIG: i32 = -32004;

pub const SCHEDULE_PARSE: i32 = -32010;
pub const TRUNCATED_INPUT: i32 = -32011;

pub const OUTPUT_ERROR: i32 = -32020;
pub const RENDER_ERROR: i32 = -32021;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidInput,
    InvalidData,
    Internal,
    External,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::InvalidData => "invalid_data",
            ErrorCategory::Internal => "internal",
            ErrorCategory::External => "external",
        }
    }

    /// Converts to a UNIX sysexits.h-compliant exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::InvalidInput => 64, // EX_USAGE
            ErrorCategory::InvalidData => 65,  // EX_DATAERR
            ErrorCategory::NotFound => 66,     // EX_NOINPUT
            ErrorCategory::Internal => 70,     // EX_SOFTWARE
            ErrorCategory::External => 74,     // EX_IOERR
        }
    }
}

impl std::str::FromStr for ErrorCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_found" => Ok(ErrorCategory::NotFound),
            "invalid_input" => Ok(ErrorCategory::InvalidInput),
            "invalid_data" => Ok(ErrorCategory::InvalidData),
            "internal" => Ok(ErrorCategory::Internal),
            "external" => Ok(ErrorCategory::External),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn category_for_code(code: i32) -> ErrorCategory {
    match code {
        INPUT_NOT_FOUND => ErrorCategory::NotFound,
        INVALID_CONFIG => ErrorCategory::InvalidInput,
        SCHEDULE_PARSE | TRUNCATED_INPUT => ErrorCategory::InvalidData,
        INPUT_UNREADABLE | OUTPUT_ERROR => ErrorCategory::External,
        _ => ErrorCategory::Internal,
    }
}
