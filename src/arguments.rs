//! Argument parsing that keeps unrecognized tokens.
//!
//! Tokens naming a registered option (and the values they take) are handed to
//! clap, everything else is kept in order as remaining arguments.

use ::std::ffi::{OsStr, OsString};

use ::clap::{Arg, ArgMatches, builder::EnumValueParser};

use crate::Severity;

/// Id of the log level option.
pub const LOG_LEVEL: &str = "loglevel";

/// Option separator, ends option recognition.
const SEPARATOR: &str = "--";

/// Create the base parser with the log level option registered.
pub fn base_parser(name: impl Into<String>, about: Option<&str>) -> ::clap::Command {
    let parser = ::clap::Command::new(name.into()).arg(
        Arg::new(LOG_LEVEL)
            .short('l')
            .long("loglevel")
            .value_name("LEVEL")
            .default_value("info")
            .ignore_case(true)
            .value_parser(EnumValueParser::<Severity>::new())
            .help("Set log level, default info"),
    );
    match about.map(description) {
        Some(about) if !about.is_empty() => parser.about(about.to_owned()),
        _ => parser,
    }
}

/// Strip blank lines surrounding a tool description.
pub fn description(doc: &str) -> &str {
    doc.trim_start_matches(['\n', '\r'])
        .trim_end_matches(|c: char| c.is_whitespace())
}

/// Result of parsing the argument vector.
#[derive(Debug, Clone)]
pub struct ParsedArguments {
    /// Values of recognized options.
    recognized: ArgMatches,
    /// Tokens not matched by any option, in order.
    remaining: Vec<OsString>,
}

impl ParsedArguments {
    /// Parse `argv`, its first element being the program name.
    ///
    /// # Errors
    /// If a recognized option is given an invalid value, or help or version
    /// output is requested.
    pub fn parse<I, T>(parser: &mut ::clap::Command, argv: I) -> Result<Self, ::clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        parser.build();
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_else(|| parser.get_name().into());
        let (known, remaining) = split_known(parser, argv);
        let recognized =
            parser.try_get_matches_from_mut(::std::iter::once(program).chain(known))?;

        Ok(Self {
            recognized,
            remaining,
        })
    }

    /// Values of recognized options.
    pub const fn recognized(&self) -> &ArgMatches {
        &self.recognized
    }

    /// Unrecognized tokens, in command line order.
    pub fn remaining(&self) -> &[OsString] {
        &self.remaining
    }

    /// Parsed log level.
    pub fn log_level(&self) -> Severity {
        self.recognized
            .get_one::<Severity>(LOG_LEVEL)
            .copied()
            .unwrap_or_default()
    }

    /// Value of an option registered with a typed value parser.
    pub fn get_one<T>(&self, id: &str) -> Option<&T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.recognized.try_get_one::<T>(id).ok().flatten()
    }
}

/// Split `tokens` into those a built `parser` recognizes and the rest.
pub fn split_known<I>(parser: &::clap::Command, tokens: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = OsString>,
{
    let takes_positionals = parser.get_arguments().any(Arg::is_positional);
    let mut known = Vec::new();
    let mut remaining = Vec::new();
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(text) = token.to_str() else {
            push_bare(token, takes_positionals, &mut known, &mut remaining);
            continue;
        };

        if text == SEPARATOR {
            remaining.extend(tokens);
            break;
        }

        let found = if let Some(long) = text.strip_prefix("--") {
            let (name, attached) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            find_long(parser, name).map(|arg| (arg, attached))
        } else if let Some(cluster) = text.strip_prefix('-').filter(|_| is_short(text)) {
            find_cluster(parser, cluster)
        } else {
            push_bare(token, takes_positionals, &mut known, &mut remaining);
            continue;
        };

        let Some((arg, attached)) = found else {
            remaining.push(token);
            continue;
        };

        known.push(token);
        if attached || !arg.get_action().takes_values() {
            continue;
        }
        let next_is_value = tokens
            .peek()
            .is_some_and(|next| arg.is_allow_hyphen_values_set() || !starts_with_hyphen(next));
        if next_is_value {
            known.extend(tokens.next());
        }
    }

    (known, remaining)
}

/// Route a token that is not an option.
fn push_bare(
    token: OsString,
    takes_positionals: bool,
    known: &mut Vec<OsString>,
    remaining: &mut Vec<OsString>,
) {
    if takes_positionals {
        known.push(token);
    } else {
        remaining.push(token);
    }
}

/// `-x` style token, excluding `-` and negative numbers.
fn is_short(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c != '-' && !c.is_ascii_digit())
}

/// Whether a token starts with a hyphen and is not a lone `-`.
fn starts_with_hyphen(token: &OsStr) -> bool {
    token
        .to_str()
        .is_some_and(|text| text.len() > 1 && text.starts_with('-'))
}

/// Resolve a short option cluster such as `vl` in `-vl`.
///
/// Flags are skipped until an option taking a value is reached, the rest of
/// the cluster being its attached value. Returns that option, or the first
/// one if none takes a value, and whether a value is attached.
fn find_cluster<'a>(parser: &'a ::clap::Command, cluster: &str) -> Option<(&'a Arg, bool)> {
    let mut chars = cluster.chars();
    let first = find_short(parser, chars.next()?)?;
    let mut current = first;
    loop {
        if current.get_action().takes_values() {
            return Some((current, !chars.as_str().is_empty()));
        }
        match chars.next().and_then(|short| find_short(parser, short)) {
            Some(next) => current = next,
            None => return Some((first, true)),
        }
    }
}

/// Find a registered option by long name or visible alias.
fn find_long<'a>(parser: &'a ::clap::Command, name: &str) -> Option<&'a Arg> {
    parser.get_arguments().find(|arg| {
        arg.get_long_and_visible_aliases()
            .is_some_and(|longs| longs.contains(&name))
    })
}

/// Find a registered option by short name or visible alias.
fn find_short(parser: &::clap::Command, short: char) -> Option<&Arg> {
    parser.get_arguments().find(|arg| {
        arg.get_short_and_visible_aliases()
            .is_some_and(|shorts| shorts.contains(&short))
    })
}

#[cfg(test)]
mod tests {
    use ::clap::ArgAction;

    use super::*;

    fn parser() -> ::clap::Command {
        base_parser("tool", None)
            .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::SetTrue))
            .arg(Arg::new("exe").short('e').long("exe"))
    }

    fn parse(argv: &[&str]) -> Result<ParsedArguments, ::clap::Error> {
        let argv = ::std::iter::once("tool").chain(argv.iter().copied());
        ParsedArguments::parse(&mut parser(), argv)
    }

    fn remaining(parsed: &ParsedArguments) -> Vec<&str> {
        parsed
            .remaining()
            .iter()
            .map(|token| token.to_str().unwrap())
            .collect()
    }

    #[test]
    fn default_log_level_is_info() {
        let parsed = parse(&[]).unwrap();
        assert_eq!(parsed.log_level(), Severity::Info);
        assert!(parsed.remaining().is_empty());
    }

    #[test]
    fn log_level_forms() {
        for argv in [
            &["-l", "warning"][..],
            &["-lwarning"],
            &["--loglevel", "WARNING"],
            &["--loglevel=Warning"],
            &["--loglevel=warn"],
        ] {
            let parsed = parse(argv).unwrap();
            assert_eq!(parsed.log_level(), Severity::Warning, "{argv:?}");
        }
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = parse(&["--loglevel", "loud"]).unwrap_err();
        assert_eq!(err.kind(), ::clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn unknown_tokens_are_kept_in_order() {
        let parsed = parse(&["--color", "always", "-l", "debug", "-x", "file", "-v"]).unwrap();

        assert_eq!(parsed.log_level(), Severity::Debug);
        assert_eq!(parsed.get_one::<bool>("verbose"), Some(&true));
        assert_eq!(remaining(&parsed), ["--color", "always", "-x", "file"]);
    }

    #[test]
    fn short_cluster_ending_in_option_takes_next_token() {
        let parsed = parse(&["-vl", "debug", "file"]).unwrap();

        assert_eq!(parsed.log_level(), Severity::Debug);
        assert_eq!(parsed.get_one::<bool>("verbose"), Some(&true));
        assert_eq!(remaining(&parsed), ["file"]);

        let parsed = parse(&["-vlerror", "file"]).unwrap();
        assert_eq!(parsed.log_level(), Severity::Error);
        assert_eq!(remaining(&parsed), ["file"]);
    }

    #[test]
    fn separator_ends_option_recognition() {
        let parsed = parse(&["-e", "ls", "--", "-l", "--verbose"]).unwrap();

        assert_eq!(
            parsed.get_one::<String>("exe").map(String::as_str),
            Some("ls")
        );
        assert_eq!(parsed.log_level(), Severity::Info);
        assert_eq!(remaining(&parsed), ["-l", "--verbose"]);
    }

    #[test]
    fn option_values_do_not_swallow_options() {
        assert!(parse(&["--exe", "-v"]).is_err());

        let parsed = parse(&["--exe", "-", "-v"]).unwrap();
        assert_eq!(
            parsed.get_one::<String>("exe").map(String::as_str),
            Some("-")
        );
        assert_eq!(parsed.get_one::<bool>("verbose"), Some(&true));
    }

    #[test]
    fn bare_tokens_go_to_positionals_when_registered() {
        let mut parser = parser().arg(Arg::new("files").num_args(0..));
        let parsed = ParsedArguments::parse(&mut parser, ["tool", "a", "--what", "b"]).unwrap();

        let files = parsed
            .recognized()
            .get_many::<String>("files")
            .unwrap()
            .map(String::as_str)
            .collect::<Vec<_>>();
        assert_eq!(files, ["a", "b"]);
        assert_eq!(remaining(&parsed), ["--what"]);
    }

    #[test]
    fn description_drops_surrounding_blank_lines() {
        assert_eq!(description("\n\nRun things.\n  More.\n\n"), "Run things.\n  More.");
        assert_eq!(description(""), "");
    }
}
