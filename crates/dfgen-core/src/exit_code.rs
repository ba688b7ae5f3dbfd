use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Document = 2,
    Convert = 3,
    Template = 4,
    DockerfileParse = 5,
    Io = 6,
    Usage = 64,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(value: &Error) -> Self {
        match value {
            Error::Document { .. } => Self::Document,
            Error::Convert(_) => Self::Convert,
            Error::Template { .. } => Self::Template,
            Error::DockerfileParse { .. } => Self::DockerfileParse,
            Error::Io { .. } => Self::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ConvertError, Error};
    use crate::exit_code::ExitCode;

    #[test]
    fn maps_error_variants_to_exit_codes() {
        assert_eq!(
            ExitCode::from(&Error::document("bad yaml")),
            ExitCode::Document
        );
        assert_eq!(
            ExitCode::from(&Error::from(ConvertError::malformed("two keys"))),
            ExitCode::Convert
        );
        assert_eq!(
            ExitCode::from(&Error::template("no such template")),
            ExitCode::Template
        );
        assert_eq!(
            ExitCode::from(&Error::dockerfile_parse("bad dockerfile")),
            ExitCode::DockerfileParse
        );
        assert_eq!(
            ExitCode::from(&Error::io(std::io::Error::from(std::io::ErrorKind::Other))),
            ExitCode::Io
        );
        assert_eq!(ExitCode::Usage.as_i32(), 64);
    }
}
