pub mod policy;

pub use policy::{CommandPolicy, PolicyRule, ValidatedCommand, ValidationError};

/// Base commands the policy allows without restriction
///
/// Used both for the direct rules (command starts with one of these) and for
/// the `find -exec` rule (the utility run by `-exec` must be one of these).
/// `find` itself is deliberately absent: it is only reachable through `-exec`.
///
/// Nothing here may delete files or change permissions. Adding a new command
/// requires careful security review.
pub const APPROVED_BASE_COMMANDS: &[&str] = &[
    // Listing and archives
    "ls",
    "tar",
    "gzip",
    "zip",
    "cp",
    "mv",
    "df",
    "ps",
    // Networking
    "ping",
    "curl",
    // Text
    "cat",
    "less",
    "more",
    "head",
    "tail",
    "grep",
    "echo",
    // System info
    "pwd",
    "whoami",
    "date",
    "uptime",
    "uname",
    "which",
    "man",
    // Text processing
    "wc",
    "sort",
    "uniq",
    "diff",
    "comm",
    "cut",
    "paste",
    "tr",
    // Resource usage
    "du",
    "free",
    "top",
    "htop",
    // Network diagnostics
    "dig",
    "nslookup",
    "host",
    "traceroute",
    "mtr",
    "netstat",
    "ss",
    "whois",
    // Misc
    "sleep",
    "time",
];

/// Wrapper utility allowed only when every `-exec` clause runs an approved command
pub const FIND_COMMAND: &str = "find";
