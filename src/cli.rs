use anyhow::Result;

use crate::config::{DEFAULT_PAGE_SIZE, SAMPLE_THREAT_COUNT};

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Seed,
    Simulate {
        count: usize,
    },
    Threats {
        page: u32,
        page_size: u32,
        severity: Option<String>,
        status: Option<String>,
    },
    Stats,
    Links,
    TrackClick {
        id: i64,
    },
    Resolve {
        id: i64,
        status: String,
        expected_version: i64,
    },
    Help,
    Version,
}

pub(crate) fn version_text() -> String {
    format!("honeyfarm-core {}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn usage_text() -> String {
    format!(
        "{version}
HoneyFarm honeypot telemetry CLI

Usage:
  honeyfarm-core seed
  honeyfarm-core simulate [--count <N>]
  honeyfarm-core threats [--page <N>] [--page-size <N>] [--severity <S>] [--status <S>]
  honeyfarm-core stats
  honeyfarm-core links
  honeyfarm-core track-click --id <ID>
  honeyfarm-core resolve --id <ID> --status <S> [--expected-version <V>]
  honeyfarm-core --help
  honeyfarm-core --version

Options:
      --count <N>             Simulate: number of threats to generate (default: {default_count})
      --page <N>              Threats: 1-based page number (default: 1)
      --page-size <N>         Threats: page size (default: {default_page_size})
      --severity <S>          Threats: filter by severity (Critical|High|Medium|Low)
      --status <S>            Threats/resolve: status (Active|Investigating|Mitigated)
      --id <ID>               Record id
      --expected-version <V>  Resolve: version read before the update (default: 1)
  -h, --help                  Show this help text
  -V, --version               Show version",
        version = version_text(),
        default_count = SAMPLE_THREAT_COUNT,
        default_page_size = DEFAULT_PAGE_SIZE
    )
}

fn parse_u32_arg(flag: &str, raw: &str) -> Result<u32> {
    raw.parse::<u32>().ok().filter(|v| *v > 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Expected a positive integer.\n\n{}",
            flag,
            raw,
            usage_text()
        )
    })
}

fn parse_i64_arg(flag: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>().ok().filter(|v| *v > 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Expected a positive integer.\n\n{}",
            flag,
            raw,
            usage_text()
        )
    })
}

fn parse_usize_arg(flag: &str, raw: &str) -> Result<usize> {
    raw.parse::<usize>().ok().filter(|v| *v > 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Expected a positive integer.\n\n{}",
            flag,
            raw,
            usage_text()
        )
    })
}

fn next_value<I, S>(iter: &mut I, flag: &str) -> Result<String>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    iter.next()
        .map(|v| v.as_ref().to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing value for {}\n\n{}", flag, usage_text()))
}

pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();

    let first = match iter.next() {
        Some(arg) => arg.as_ref().to_string(),
        None => return Ok(CliCommand::Help),
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(CliCommand::Help),
        "-V" | "--version" | "version" => Ok(CliCommand::Version),
        "seed" => Ok(CliCommand::Seed),
        "stats" => Ok(CliCommand::Stats),
        "links" => Ok(CliCommand::Links),
        "simulate" => {
            let mut count = SAMPLE_THREAT_COUNT;
            while let Some(arg) = iter.next() {
                match arg.as_ref() {
                    "--count" => {
                        let raw = next_value(&mut iter, "--count")?;
                        count = parse_usize_arg("--count", &raw)?;
                    }
                    other => {
                        return Err(anyhow::anyhow!(
                            "Unknown argument '{}'\n\n{}",
                            other,
                            usage_text()
                        ));
                    }
                }
            }
            Ok(CliCommand::Simulate { count })
        }
        "threats" => {
            let mut page = 1u32;
            let mut page_size = DEFAULT_PAGE_SIZE;
            let mut severity = None;
            let mut status = None;
            while let Some(arg) = iter.next() {
                match arg.as_ref() {
                    "--page" => {
                        let raw = next_value(&mut iter, "--page")?;
                        page = parse_u32_arg("--page", &raw)?;
                    }
                    "--page-size" => {
                        let raw = next_value(&mut iter, "--page-size")?;
                        page_size = parse_u32_arg("--page-size", &raw)?;
                    }
                    "--severity" => severity = Some(next_value(&mut iter, "--severity")?),
                    "--status" => status = Some(next_value(&mut iter, "--status")?),
                    other => {
                        return Err(anyhow::anyhow!(
                            "Unknown argument '{}'\n\n{}",
                            other,
                            usage_text()
                        ));
                    }
                }
            }
            Ok(CliCommand::Threats {
                page,
                page_size,
                severity,
                status,
            })
        }
        "track-click" => {
            let mut id = None;
            while let Some(arg) = iter.next() {
                match arg.as_ref() {
                    "--id" => {
                        let raw = next_value(&mut iter, "--id")?;
                        id = Some(parse_i64_arg("--id", &raw)?);
                    }
                    other => {
                        return Err(anyhow::anyhow!(
                            "Unknown argument '{}'\n\n{}",
                            other,
                            usage_text()
                        ));
                    }
                }
            }
            let id =
                id.ok_or_else(|| anyhow::anyhow!("track-click requires --id\n\n{}", usage_text()))?;
            Ok(CliCommand::TrackClick { id })
        }
        "resolve" => {
            let mut id = None;
            let mut status = None;
            let mut expected_version = 1i64;
            while let Some(arg) = iter.next() {
                match arg.as_ref() {
                    "--id" => {
                        let raw = next_value(&mut iter, "--id")?;
                        id = Some(parse_i64_arg("--id", &raw)?);
                    }
                    "--status" => status = Some(next_value(&mut iter, "--status")?),
                    "--expected-version" => {
                        let raw = next_value(&mut iter, "--expected-version")?;
                        expected_version = parse_i64_arg("--expected-version", &raw)?;
                    }
                    other => {
                        return Err(anyhow::anyhow!(
                            "Unknown argument '{}'\n\n{}",
                            other,
                            usage_text()
                        ));
                    }
                }
            }
            let id = id.ok_or_else(|| anyhow::anyhow!("resolve requires --id\n\n{}", usage_text()))?;
            let status = status
                .ok_or_else(|| anyhow::anyhow!("resolve requires --status\n\n{}", usage_text()))?;
            Ok(CliCommand::Resolve {
                id,
                status,
                expected_version,
            })
        }
        other => Err(anyhow::anyhow!(
            "Unknown command '{}'\n\n{}",
            other,
            usage_text()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_is_help() {
        let cmd = parse_cli_args(Vec::<String>::new()).unwrap();
        assert_eq!(cmd, CliCommand::Help);
    }

    #[test]
    fn test_parse_simulate_with_count() {
        let cmd = parse_cli_args(["simulate", "--count", "10"]).unwrap();
        assert_eq!(cmd, CliCommand::Simulate { count: 10 });
    }

    #[test]
    fn test_parse_threats_with_filters() {
        let cmd = parse_cli_args([
            "threats",
            "--page",
            "2",
            "--page-size",
            "25",
            "--severity",
            "Critical",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            CliCommand::Threats {
                page: 2,
                page_size: 25,
                severity: Some("Critical".to_string()),
                status: None,
            }
        );
    }

    #[test]
    fn test_parse_resolve() {
        let cmd = parse_cli_args([
            "resolve",
            "--id",
            "5",
            "--status",
            "Mitigated",
            "--expected-version",
            "3",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            CliCommand::Resolve {
                id: 5,
                status: "Mitigated".to_string(),
                expected_version: 3,
            }
        );
    }

    #[test]
    fn test_track_click_requires_id() {
        assert!(parse_cli_args(["track-click"]).is_err());
        let cmd = parse_cli_args(["track-click", "--id", "3"]).unwrap();
        assert_eq!(cmd, CliCommand::TrackClick { id: 3 });
    }

    #[test]
    fn test_rejects_zero_page() {
        assert!(parse_cli_args(["threats", "--page", "0"]).is_err());
    }

    #[test]
    fn test_unknown_command_errors_with_usage() {
        let err = parse_cli_args(["frobnicate"]).unwrap_err();
        assert!(err.to_string().contains("Usage:"));
    }
}
