//! Parsing Options.
//! `flowprobe [--config FILE] [--format json|ron] [--output FILE] [--seed N] <command>`

use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::io::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Linear,
    Tiered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the known scenarios.
    List,
    /// Fire transitions in order and print the resulting snapshot.
    Flow {
        scenario: String,
        transitions: Vec<String>,
    },
    /// Graphviz rendering of a scenario's initial marking.
    Dot { scenario: String },
    /// Fill a table and print its snapshot.
    Probe {
        kind: TableKind,
        count: Option<usize>,
        fill: bool,
    },
    /// Linear vs. tiered at the configured fill ratio.
    Compare,
}

fn make_options_parser() -> Command {
    Command::new("flowprobe")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Token-flow and probe-table engines behind the blog visualizations")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .default_value("flowprobe.toml"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .global(true)
                .value_parser(["json", "ron"])
                .default_value("json"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .global(true)
                .help("Write the snapshot to FILE instead of stdout"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .global(true)
                .value_parser(clap::value_parser!(u64))
                .help("Seed for the key generator, overrides the config file"),
        )
        .subcommand(Command::new("list").about("List the demo scenarios"))
        .subcommand(
            Command::new("flow")
                .about("Fire transitions of a scenario in order")
                .arg(Arg::new("scenario").required(true))
                .arg(Arg::new("transitions").num_args(0..).action(ArgAction::Append)),
        )
        .subcommand(
            Command::new("dot")
                .about("Print a scenario as Graphviz")
                .arg(Arg::new("scenario").required(true)),
        )
        .subcommand(
            Command::new("probe")
                .about("Insert generated keys into a probe table")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(["linear", "tiered"]),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_parser(clap::value_parser!(usize))
                        .conflicts_with("fill"),
                )
                .arg(
                    Arg::new("fill")
                        .long("fill")
                        .action(ArgAction::SetTrue)
                        .help("Fill to the configured ratio"),
                ),
        )
        .subcommand(Command::new("compare").about("Compare linear and tiered tables at the fill ratio"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub action: Action,
    pub config: String,
    pub format: Format,
    pub output: Option<String>,
    pub seed: Option<u64>,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self> {
        let matches = make_options_parser().try_get_matches_from(flags.iter())?;
        let (name, sub) = matches
            .subcommand()
            .ok_or_else(|| anyhow!("missing command"))?;
        let action = match name {
            "list" => Action::List,
            "flow" => Action::Flow {
                scenario: required(sub, "scenario")?,
                transitions: sub
                    .get_many::<String>("transitions")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            },
            "dot" => Action::Dot {
                scenario: required(sub, "scenario")?,
            },
            "probe" => Action::Probe {
                kind: match required(sub, "kind")?.as_str() {
                    "linear" => TableKind::Linear,
                    "tiered" => TableKind::Tiered,
                    other => return Err(anyhow!("unsupported table kind `{}`", other)),
                },
                count: sub.get_one::<usize>("count").copied(),
                fill: sub.get_flag("fill"),
            },
            "compare" => Action::Compare,
            other => return Err(anyhow!("unsupported command `{}`", other)),
        };

        let config = global::<String>(&matches, sub, "config")
            .ok_or_else(|| anyhow!("missing argument `config`"))?;
        let format = global::<String>(&matches, sub, "format")
            .and_then(|name| Format::from_name(&name))
            .ok_or_else(|| anyhow!("unsupported format"))?;
        Ok(Options {
            action,
            config,
            format,
            output: global::<String>(&matches, sub, "output"),
            seed: global::<u64>(&matches, sub, "seed"),
        })
    }
}

/// Global args may land on either the subcommand or the top level.
fn global<T>(top: &ArgMatches, sub: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    sub.get_one::<T>(id)
        .or_else(|| top.get_one::<T>(id))
        .cloned()
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("missing argument `{}`", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flow_with_transitions() {
        let options = Options::parse_from_str("flow checkout beginCheckout failPayment").unwrap();
        assert_eq!(
            options.action,
            Action::Flow {
                scenario: "checkout".into(),
                transitions: vec!["beginCheckout".into(), "failPayment".into()],
            }
        );
        assert_eq!(options.format, Format::Json);
        assert_eq!(options.config, "flowprobe.toml");
    }

    #[test]
    fn test_parse_globals_after_subcommand() {
        let options = Options::parse_from_str("probe tiered --fill --seed 9 -f ron").unwrap();
        assert_eq!(
            options.action,
            Action::Probe {
                kind: TableKind::Tiered,
                count: None,
                fill: true
            }
        );
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.format, Format::Ron);
    }

    #[test]
    fn test_parse_from_str_err() {
        assert!(Options::parse_from_str("probe cuckoo").is_err());
        assert!(Options::parse_from_str("probe linear -n 5 --fill").is_err());
        assert!(Options::parse_from_str("").is_err());
        assert!(Options::parse_from_str("flow \"unterminated").is_err());
    }
}
