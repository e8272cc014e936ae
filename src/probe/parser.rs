//! Extraction of round-trip statistics from ping's summary line
//!
//! Every supported platform prints the statistics on one line, but the
//! field order differs:
//!
//! ```text
//! iputils:  rtt min/avg/max/mdev = 0.016/0.020/0.025/0.005 ms
//! BSD:      round-trip min/avg/max/stddev = 6.841/7.521/8.084/0.514 ms
//! busybox:  round-trip min/avg/max = 0.058/0.067/0.081 ms
//! Windows:  Minimum = 40ms, Maximum = 42ms, Average = 41ms
//! ```
//!
//! Busybox ping is common on Linux hosts that otherwise use the iputils
//! flags, so the iputils pattern also takes the three-field summary.
//!
//! Parsing is all-or-nothing: a summary that does not match, or that has a
//! field which is not a number, is reported as a failure instead of a
//! partially filled record.

use crate::error::AppError;
use crate::types::PlatformFormat;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const IPUTILS_PATTERN: &str =
    r"min/avg/max(?:/mdev)? = ([0-9.]+)/([0-9.]+)/([0-9.]+)(?:/([0-9.]+))? ms";
const BSD_PATTERN: &str =
    r"min/avg/max(?:/std-?dev)? = ([0-9.]+)/([0-9.]+)/([0-9.]+)(?:/([0-9.]+))? ms";
const WINDOWS_PATTERN: &str =
    r"Minimum = ([0-9]+)ms, Maximum = ([0-9]+)ms, Average = ([0-9]+)ms";

/// Numeric fields recovered from one probe run, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    /// mdev/stddev as printed by ping; Windows never reports one
    pub deviation: Option<f64>,
}

/// Reasons a probe output could not be turned into statistics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("no {0} summary line found in probe output")]
    NoMatch(PlatformFormat),

    #[error("invalid number '{0}' in probe output")]
    InvalidNumber(String),

    #[error("inconsistent statistics min={min} avg={avg} max={max}")]
    Inconsistent { min: f64, avg: f64, max: f64 },
}

impl From<ParseFailure> for AppError {
    fn from(failure: ParseFailure) -> Self {
        AppError::parse(failure.to_string())
    }
}

/// Position of each statistic among a format's capture groups
struct FieldLayout {
    min: usize,
    avg: usize,
    max: usize,
    deviation: Option<usize>,
}

impl PlatformFormat {
    fn pattern(&self) -> &'static Regex {
        static IPUTILS: OnceLock<Regex> = OnceLock::new();
        static BSD: OnceLock<Regex> = OnceLock::new();
        static WINDOWS: OnceLock<Regex> = OnceLock::new();

        match self {
            Self::IpUtils => IPUTILS.get_or_init(|| Regex::new(IPUTILS_PATTERN).expect("iputils pattern compiles")),
            Self::Bsd => BSD.get_or_init(|| Regex::new(BSD_PATTERN).expect("bsd pattern compiles")),
            Self::Windows => WINDOWS.get_or_init(|| Regex::new(WINDOWS_PATTERN).expect("windows pattern compiles")),
        }
    }

    /// Windows prints Minimum, Maximum, Average; unix prints min/avg/max
    fn layout(&self) -> FieldLayout {
        match self {
            Self::IpUtils | Self::Bsd => FieldLayout { min: 1, avg: 2, max: 3, deviation: Some(4) },
            Self::Windows => FieldLayout { min: 1, max: 2, avg: 3, deviation: None },
        }
    }
}

/// Parse the captured stdout of one ping invocation
pub fn parse_output(output: &str, format: PlatformFormat) -> Result<ParsedStats, ParseFailure> {
    let captures = format
        .pattern()
        .captures(output)
        .ok_or(ParseFailure::NoMatch(format))?;

    let field = |index: usize| -> Result<f64, ParseFailure> {
        let text = captures
            .get(index)
            .ok_or(ParseFailure::NoMatch(format))?
            .as_str();
        parse_number(text)
    };

    let layout = format.layout();
    let min = field(layout.min)?;
    let avg = field(layout.avg)?;
    let max = field(layout.max)?;

    // The BSD deviation group is optional (busybox omits it)
    let deviation = match layout.deviation {
        Some(index) => match captures.get(index) {
            Some(m) => Some(parse_number(m.as_str())?),
            None => None,
        },
        None => None,
    };

    if !(min <= avg && avg <= max) {
        return Err(ParseFailure::Inconsistent { min, avg, max });
    }

    Ok(ParsedStats { min, avg, max, deviation })
}

fn parse_number(text: &str) -> Result<f64, ParseFailure> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ParseFailure::InvalidNumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPUTILS_OUTPUT: &str = "\
PING localhost (127.0.0.1) 56(84) bytes of data.
64 bytes from localhost (127.0.0.1): icmp_seq=1 ttl=64 time=0.016 ms
64 bytes from localhost (127.0.0.1): icmp_seq=2 ttl=64 time=0.025 ms

--- localhost ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3059ms
rtt min/avg/max/mdev = 0.016/0.020/0.025/0.005 ms
";

    const MACOS_OUTPUT: &str = "\
PING example.com (93.184.216.34): 56 data bytes
64 bytes from 93.184.216.34: icmp_seq=0 ttl=56 time=6.841 ms

--- example.com ping statistics ---
4 packets transmitted, 4 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 6.841/7.521/8.084/0.514 ms
";

    const BUSYBOX_OUTPUT: &str = "\
--- 10.0.0.1 ping statistics ---
4 packets transmitted, 4 packets received, 0% packet loss
round-trip min/avg/max = 0.058/0.067/0.081 ms
";

    const WINDOWS_OUTPUT: &str = "\r
Pinging example.com [93.184.216.34] with 32 bytes of data:\r
Reply from 93.184.216.34: bytes=32 time=40ms TTL=56\r
\r
Ping statistics for 93.184.216.34:\r
    Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),\r
Approximate round trip times in milli-seconds:\r
    Minimum = 40ms, Maximum = 42ms, Average = 41ms\r
";

    #[test]
    fn test_patterns_compile() {
        for format in [PlatformFormat::IpUtils, PlatformFormat::Bsd, PlatformFormat::Windows] {
            let _ = format.pattern();
        }
    }

    #[test]
    fn test_parse_iputils() {
        let stats = parse_output(IPUTILS_OUTPUT, PlatformFormat::IpUtils).unwrap();
        assert_eq!(stats.min, 0.016);
        assert_eq!(stats.avg, 0.020);
        assert_eq!(stats.max, 0.025);
        assert_eq!(stats.deviation, Some(0.005));
    }

    #[test]
    fn test_parse_macos() {
        let stats = parse_output(MACOS_OUTPUT, PlatformFormat::Bsd).unwrap();
        assert_eq!(stats.min, 6.841);
        assert_eq!(stats.avg, 7.521);
        assert_eq!(stats.max, 8.084);
        assert_eq!(stats.deviation, Some(0.514));
    }

    #[test]
    fn test_parse_busybox_without_deviation() {
        let stats = parse_output(BUSYBOX_OUTPUT, PlatformFormat::Bsd).unwrap();
        assert_eq!(stats.min, 0.058);
        assert_eq!(stats.avg, 0.067);
        assert_eq!(stats.max, 0.081);
        assert_eq!(stats.deviation, None);
    }

    #[test]
    fn test_busybox_summary_with_iputils_flags() {
        let stats = parse_output(BUSYBOX_OUTPUT, PlatformFormat::IpUtils).unwrap();
        assert_eq!(stats.min, 0.058);
        assert_eq!(stats.avg, 0.067);
        assert_eq!(stats.max, 0.081);
        assert_eq!(stats.deviation, None);
    }

    #[test]
    fn test_windows_fields_are_remapped() {
        let stats = parse_output(
            "Minimum = 10ms, Maximum = 30ms, Average = 20ms",
            PlatformFormat::Windows,
        )
        .unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.avg, 20.0);
        assert_eq!(stats.deviation, None);
    }

    #[test]
    fn test_parse_full_windows_output() {
        let stats = parse_output(WINDOWS_OUTPUT, PlatformFormat::Windows).unwrap();
        assert_eq!((stats.min, stats.avg, stats.max), (40.0, 41.0, 42.0));
    }

    #[test]
    fn test_empty_output_fails() {
        for format in [PlatformFormat::IpUtils, PlatformFormat::Bsd, PlatformFormat::Windows] {
            assert_eq!(parse_output("", format), Err(ParseFailure::NoMatch(format)));
        }
    }

    #[test]
    fn test_unreachable_host_output_fails() {
        let output = "\
PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.

--- 10.255.255.1 ping statistics ---
4 packets transmitted, 0 received, 100% packet loss, time 3071ms
";
        assert!(matches!(
            parse_output(output, PlatformFormat::IpUtils),
            Err(ParseFailure::NoMatch(_))
        ));
    }

    #[test]
    fn test_partial_summary_fails() {
        let output = "rtt min/avg/max/mdev = 0.016/0.020 ms";
        assert!(parse_output(output, PlatformFormat::IpUtils).is_err());

        let output = "Minimum = 10ms, Maximum = 30ms";
        assert!(parse_output(output, PlatformFormat::Windows).is_err());
    }

    #[test]
    fn test_invalid_number_fails() {
        let output = "rtt min/avg/max/mdev = 0.0.16/0.020/0.025/0.005 ms";
        assert_eq!(
            parse_output(output, PlatformFormat::IpUtils),
            Err(ParseFailure::InvalidNumber("0.0.16".to_string()))
        );
    }

    #[test]
    fn test_wrong_format_does_not_match() {
        assert!(parse_output(WINDOWS_OUTPUT, PlatformFormat::IpUtils).is_err());
        assert!(parse_output(IPUTILS_OUTPUT, PlatformFormat::Windows).is_err());
    }

    #[test]
    fn test_out_of_order_values_rejected() {
        let output = "rtt min/avg/max/mdev = 5.0/2.0/3.0/0.1 ms";
        assert!(matches!(
            parse_output(output, PlatformFormat::IpUtils),
            Err(ParseFailure::Inconsistent { .. })
        ));
    }

    #[test]
    fn test_failure_converts_to_parse_error() {
        let error: AppError = ParseFailure::NoMatch(PlatformFormat::Bsd).into();
        assert_eq!(error.category(), "PARSE");
        assert!(error.to_string().contains("bsd"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn ordered() -> impl Strategy<Value = (u32, u32, u32)> {
            (0u32..5000, 0u32..5000, 0u32..5000).prop_map(|(a, b, c)| {
                let mut v = [a, b, c];
                v.sort_unstable();
                (v[0], v[1], v[2])
            })
        }

        proptest! {
            #[test]
            fn windows_assignment_matches_labels((min, avg, max) in ordered()) {
                let output = format!("Minimum = {}ms, Maximum = {}ms, Average = {}ms", min, max, avg);
                let stats = parse_output(&output, PlatformFormat::Windows).unwrap();
                prop_assert_eq!(stats.min, min as f64);
                prop_assert_eq!(stats.avg, avg as f64);
                prop_assert_eq!(stats.max, max as f64);
            }

            #[test]
            fn iputils_assignment_matches_labels((min, avg, max) in ordered(), mdev in 0u32..1000) {
                let output = format!(
                    "rtt min/avg/max/mdev = {}.250/{}.250/{}.250/{}.125 ms",
                    min, avg, max, mdev
                );
                let stats = parse_output(&output, PlatformFormat::IpUtils).unwrap();
                prop_assert_eq!(stats.min, min as f64 + 0.25);
                prop_assert_eq!(stats.avg, avg as f64 + 0.25);
                prop_assert_eq!(stats.max, max as f64 + 0.25);
                prop_assert_eq!(stats.deviation, Some(mdev as f64 + 0.125));
            }

            #[test]
            fn arbitrary_text_never_yields_partial_stats(text in "[ -~]{0,80}") {
                if let Ok(stats) = parse_output(&text, PlatformFormat::IpUtils) {
                    prop_assert!(stats.min <= stats.avg && stats.avg <= stats.max);
                }
            }
        }
    }
}
