//! Line commands read from stdin while the session is live.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};

use voicepath::session::{Band, SessionHandle};

pub const HELP: &str = "\
commands:
  pitch <v>     set pitch offset
  volume <v>    set volume
  mute          toggle mute
  echo          toggle echo
  bass <v>      set bass band  (also: mid, treble)
  help          show this text
  quit          stop and exit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Pitch(f32),
    Volume(f32),
    Mute,
    Echo,
    Band(Band, f32),
    Help,
    Quit,
}

impl Command {
    /// Forward to the session; returns false if the control queue was full.
    pub fn send(self, handle: &mut SessionHandle) -> bool {
        match self {
            Command::Pitch(v) => handle.set_pitch_offset(v),
            Command::Volume(v) => handle.set_volume(v),
            Command::Mute => handle.toggle_mute(),
            Command::Echo => handle.toggle_echo(),
            Command::Band(band, v) => handle.set_band(band, v),
            Command::Help | Command::Quit => true,
        }
    }
}

fn value(word: &str, arg: Option<&str>) -> EyreResult<f32> {
    let arg = arg.ok_or_else(|| eyre!("`{}` needs a value", word))?;
    arg.parse::<f32>()
        .wrap_err_with(|| format!("`{}` is not a number", arg))
}

/// Parse one line. Blank lines yield `None`.
pub fn parse(line: &str) -> EyreResult<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match word.to_lowercase().as_str() {
        "pitch" | "p" => Command::Pitch(value(word, arg)?),
        "volume" | "vol" | "v" => Command::Volume(value(word, arg)?),
        "mute" | "m" => Command::Mute,
        "echo" | "e" => Command::Echo,
        "bass" => Command::Band(Band::Bass, value(word, arg)?),
        "mid" => Command::Band(Band::Mid, value(word, arg)?),
        "treble" => Command::Band(Band::Treble, value(word, arg)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(eyre!("unknown command `{}` (try `help`)", other)),
    };
    Ok(Some(command))
}
