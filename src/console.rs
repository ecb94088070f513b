//! Slash commands typed into the console.

use std::path::PathBuf;

use crate::error::CommandError;
use crate::harness::Event;

pub const HELP: &[&str] = &[
    "/set <slider> <value>     move a slider",
    "/press <button>           press a button",
    "/select <radio> <option>  pick a radio option",
    "/color <region> <color>   recolor a region (0=Red 1=Blue 2=Green 3=Yellow)",
    "/tick                     advance the animation one frame",
    "/controls  /summary       show controls / statistics",
    "/snapshot <path>          save the current frame as png",
    "/export <path>            save the current dataset as json",
    "/help  /quit",
];

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Event(Event),
    Controls,
    Summary,
    Snapshot(PathBuf),
    Export(PathBuf),
    Help,
    Quit,
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse().map_err(|_| CommandError::NotANumber(word.to_string()))
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Err(CommandError::Empty);
    };

    match (head, args) {
        ("/set", [name, value]) => Ok(Command::Event(Event::Slider {
            name: name.to_string(),
            value: number(value)?,
        })),
        ("/set", _) => Err(CommandError::Usage("/set <slider> <value>")),
        ("/press", [name]) => Ok(Command::Event(Event::Button(name.to_string()))),
        ("/press", _) => Err(CommandError::Usage("/press <button>")),
        ("/select", [name, option]) => Ok(Command::Event(Event::Radio {
            name: name.to_string(),
            option: option.to_string(),
        })),
        ("/select", _) => Err(CommandError::Usage("/select <radio> <option>")),
        ("/color", [region, color]) => Ok(Command::Event(Event::Assign {
            item: number(region)?,
            value: number(color)?,
        })),
        ("/color", _) => Err(CommandError::Usage("/color <region> <color>")),
        ("/tick", []) => Ok(Command::Event(Event::Tick)),
        ("/tick", _) => Err(CommandError::Usage("/tick")),
        ("/controls", []) => Ok(Command::Controls),
        ("/controls", _) => Err(CommandError::Usage("/controls")),
        ("/summary", []) => Ok(Command::Summary),
        ("/summary", _) => Err(CommandError::Usage("/summary")),
        ("/snapshot", [path]) => Ok(Command::Snapshot(PathBuf::from(path))),
        ("/snapshot", _) => Err(CommandError::Usage("/snapshot <path>")),
        ("/export", [path]) => Ok(Command::Export(PathBuf::from(path))),
        ("/export", _) => Err(CommandError::Usage("/export <path>")),
        ("/help", []) => Ok(Command::Help),
        ("/help", _) => Err(CommandError::Usage("/help")),
        ("/quit", []) => Ok(Command::Quit),
        ("/quit", _) => Err(CommandError::Usage("/quit")),
        _ => Err(CommandError::Unknown(line.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_events() {
        assert_eq!(
            parse_command("/set omega_m 0.5"),
            Ok(Command::Event(Event::Slider { name: "omega_m".into(), value: 0.5 }))
        );
        assert_eq!(parse_command("  /press   next "), Ok(Command::Event(Event::Button("next".into()))));
        assert_eq!(
            parse_command("/select knot figure-eight"),
            Ok(Command::Event(Event::Radio { name: "knot".into(), option: "figure-eight".into() }))
        );
        assert_eq!(parse_command("/color 3 2"), Ok(Command::Event(Event::Assign { item: 3, value: 2 })));
        assert_eq!(parse_command("/tick"), Ok(Command::Event(Event::Tick)));
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("/quit"), Ok(Command::Quit));
        assert_eq!(parse_command("/summary"), Ok(Command::Summary));
        assert_eq!(parse_command("/snapshot out.png"), Ok(Command::Snapshot("out.png".into())));
        assert_eq!(parse_command("/export data.json"), Ok(Command::Export("data.json".into())));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("/set omega_m"), Err(CommandError::Usage("/set <slider> <value>")));
        assert_eq!(parse_command("/set omega_m lots"), Err(CommandError::NotANumber("lots".into())));
        assert_eq!(parse_command("/color two 1"), Err(CommandError::NotANumber("two".into())));
        assert_eq!(parse_command("/fly"), Err(CommandError::Unknown("/fly".into())));
    }

    #[test]
    fn bare_commands_reject_arguments() {
        assert_eq!(parse_command("/tick 3"), Err(CommandError::Usage("/tick")));
        assert_eq!(parse_command("/help extra"), Err(CommandError::Usage("/help")));
        assert_eq!(parse_command("/quit now"), Err(CommandError::Usage("/quit")));
        assert_eq!(parse_command("/summary all"), Err(CommandError::Usage("/summary")));
        assert_eq!(parse_command("/help"), Ok(Command::Help));
    }
}
