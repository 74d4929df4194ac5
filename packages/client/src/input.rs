//! Parsing of terminal input lines into user commands.

use std::str::FromStr;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Load { video_id: String, start_at: f64 },
    Play,
    Pause,
    Stop,
    Seek(f64),
    Volume(i64),
    Mute,
    Unmute,
    Search(String),
    Info(String),
    List,
    Status,
    Help,
    Quit,
}

impl FromStr for UserCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "load" => {
                let mut args = rest.split_whitespace();
                let video_id = args
                    .next()
                    .ok_or_else(|| "Usage: load <videoId> [seconds]".to_string())?;
                let start_at = match args.next() {
                    Some(value) => parse_seconds(value)?,
                    None => 0.0,
                };
                Ok(Self::Load {
                    video_id: video_id.to_string(),
                    start_at,
                })
            }
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "stop" => Ok(Self::Stop),
            "seek" => {
                if rest.is_empty() {
                    return Err("Usage: seek <seconds>".to_string());
                }
                parse_seconds(rest).map(Self::Seek)
            }
            "volume" | "vol" => rest
                .parse::<i64>()
                .map(Self::Volume)
                .map_err(|_| "Usage: volume <0-100>".to_string()),
            "mute" => Ok(Self::Mute),
            "unmute" => Ok(Self::Unmute),
            "search" => {
                if rest.is_empty() {
                    return Err("Usage: search <query>".to_string());
                }
                Ok(Self::Search(rest.to_string()))
            }
            "info" => {
                if rest.is_empty() {
                    return Err("Usage: info <videoId>".to_string());
                }
                Ok(Self::Info(rest.to_string()))
            }
            "list" | "ls" => Ok(Self::List),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err("Type 'help' for a list of commands".to_string()),
            other => Err(format!(
                "Unknown command '{}'. Type 'help' for a list of commands",
                other
            )),
        }
    }
}

/// Seconds as a plain number or `M:SS`.
fn parse_seconds(value: &str) -> Result<f64, String> {
    let invalid = || format!("Invalid time '{}'", value);

    let seconds = match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
            let seconds = seconds.parse::<f64>().map_err(|_| invalid())?;
            if !(0.0..60.0).contains(&seconds) {
                return Err(invalid());
            }
            f64::from(minutes) * 60.0 + seconds
        }
        None => value.parse::<f64>().map_err(|_| invalid())?,
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }
    Ok(seconds)
}
