#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    SYST,
    PWD,
    TYPE,
    CWD,
    CDUP,
    PASV,
    LIST,
    RETR,
    STOR,
}

// Checked in order; RETR and STOR only match with their trailing space.
const KEYWORDS: [(&str, FtpCommand); 12] = [
    ("USER", FtpCommand::USER),
    ("PASS", FtpCommand::PASS),
    ("QUIT", FtpCommand::QUIT),
    ("SYST", FtpCommand::SYST),
    ("PWD", FtpCommand::PWD),
    ("TYPE", FtpCommand::TYPE),
    ("CWD", FtpCommand::CWD),
    ("CDUP", FtpCommand::CDUP),
    ("PASV", FtpCommand::PASV),
    ("LIST", FtpCommand::LIST),
    ("RETR ", FtpCommand::RETR),
    ("STOR ", FtpCommand::STOR),
];

impl FtpCommand {
    /// Matches a raw control line by case-sensitive keyword prefix.
    ///
    /// Whatever follows the keyword is not validated, so `LISTfoo` is a LIST.
    pub fn from_line(line: &str) -> Option<FtpCommand> {
        KEYWORDS
            .iter()
            .find(|(keyword, _)| line.starts_with(keyword))
            .map(|(_, command)| *command)
    }

    /// Splits a control line into its command and argument.
    ///
    /// The argument is everything after the keyword and one space, cut at the
    /// first CR or LF.
    pub fn parse(line: &str) -> Option<(FtpCommand, String)> {
        let command = Self::from_line(line)?;
        let rest = line.get(command.keyword().len()..).unwrap_or_default();
        let rest = match command {
            FtpCommand::RETR | FtpCommand::STOR => rest,
            _ => rest.strip_prefix(' ').unwrap_or(rest),
        };
        let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
        Some((command, rest[..end].to_string()))
    }

    pub fn keyword(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or_default()
    }
}
