use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text: becomes the new query text
    Query(String),
    CreativeCommons(bool),
    DatesOff,
    Dates {
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    },
    State,
    Log(usize),
    Help,
    Quit,
}

const DEFAULT_LOG_LINES: usize = 20;

pub fn parse(line: &str) -> Result<Command, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Query(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("cc", ["on"]) => Ok(Command::CreativeCommons(true)),
        ("cc", ["off"]) => Ok(Command::CreativeCommons(false)),
        ("cc", _) => Err("usage: :cc on|off".to_string()),
        ("dates", ["off"]) => Ok(Command::DatesOff),
        ("dates", [min, max]) => Ok(Command::Dates {
            min: parse_date(min, NaiveTime::MIN)?,
            max: parse_date(max, end_of_day())?,
        }),
        ("dates", _) => Err("usage: :dates off | :dates <min> <max>".to_string()),
        ("state", []) => Ok(Command::State),
        ("log", []) => Ok(Command::Log(DEFAULT_LOG_LINES)),
        ("log", [n]) => n
            .parse()
            .map(Command::Log)
            .map_err(|_| format!("not a number: {n}")),
        ("help", _) => Ok(Command::Help),
        ("quit" | "q", _) => Ok(Command::Quit),
        _ => Err(format!("unknown command :{name} (try :help)")),
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` at `time_of_day` UTC
fn parse_date(s: &str, time_of_day: NaiveTime) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(time_of_day).and_utc())
        .map_err(|_| format!("not a date: {s} (use YYYY-MM-DD or RFC 3339)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_text_is_query() {
        assert_eq!(parse("James Bond").unwrap(), Command::Query("James Bond".to_string()));
    }

    #[test]
    fn test_creative_commons() {
        assert_eq!(parse(":cc on").unwrap(), Command::CreativeCommons(true));
        assert_eq!(parse(":cc off").unwrap(), Command::CreativeCommons(false));
        assert!(parse(":cc maybe").is_err());
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse(":dates off").unwrap(), Command::DatesOff);
        assert_eq!(
            parse(":dates 2015-01-01 2015-12-31").unwrap(),
            Command::Dates {
                min: Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap(),
                max: Utc.with_ymd_and_hms(2015, 12, 31, 23, 59, 59).unwrap(),
            }
        );
        assert!(parse(":dates 2015-01-01").is_err());
        assert!(parse(":dates yesterday today").is_err());
    }

    #[test]
    fn test_rfc3339_dates() {
        let cmd = parse(":dates 2015-01-01T12:00:00+02:00 2015-01-02T00:00:00Z").unwrap();
        assert_eq!(
            cmd,
            Command::Dates {
                min: Utc.with_ymd_and_hms(2015, 1, 1, 10, 0, 0).unwrap(),
                max: Utc.with_ymd_and_hms(2015, 1, 2, 0, 0, 0).unwrap(),
            }
        );
    }

    #[test]
    fn test_log_and_misc() {
        assert_eq!(parse(":log").unwrap(), Command::Log(DEFAULT_LOG_LINES));
        assert_eq!(parse(":log 5").unwrap(), Command::Log(5));
        assert!(parse(":log five").is_err());
        assert_eq!(parse(":state").unwrap(), Command::State);
        assert_eq!(parse(":q").unwrap(), Command::Quit);
        assert!(parse(":frobnicate").is_err());
    }
}
