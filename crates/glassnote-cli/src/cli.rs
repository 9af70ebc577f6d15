use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "glassnote - a notepad with slash shortcuts",
    long_about = "glassnote is a terminal notepad that expands /shortcuts as you type. \
                  Run it without a command to open the notepad."
)]
pub struct Glassnote {
    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new shortcut
    Add {
        #[clap(long, short = 't', help = "Trigger typed after the slash")]
        trigger: String,

        #[clap(long, short = 'c', help = "Text the trigger expands to")]
        content: String,

        #[clap(long, short = 'f', help = "Overwrite an existing shortcut")]
        force: bool,
    },
    /// Delete a shortcut by trigger
    Delete {
        #[clap(long, short = 't', help = "Trigger of the shortcut to delete")]
        trigger: String,
    },
    /// Change the content of an existing shortcut
    Update {
        #[clap(long, short = 't', help = "Trigger of the shortcut to update")]
        trigger: String,

        #[clap(long, short = 'c', help = "New content")]
        content: String,
    },
    /// List shortcuts
    List {
        #[clap(long, short = 'g', help = "Show shortcuts generated from accounting data")]
        generated: bool,

        #[clap(long, short = 'a', conflicts_with = "generated", help = "Show every shortcut")]
        all: bool,
    },
    /// Replace the accounting data that generated shortcuts come from
    Import {
        #[clap(help = "File with tab-separated rows, or - to read stdin")]
        file: String,
    },
    /// Expand shortcuts in a piece of text
    Expand {
        #[clap(long, short = 'x', help = "Text to expand")]
        text: String,

        #[clap(
            long,
            help = "Only expand the trigger ending at this char offset, as typing a space would"
        )]
        cursor: Option<usize>,
    },
    /// Show or change settings
    Settings {
        #[clap(subcommand)]
        action: Option<SettingsCommand>,
    },
    /// List note tabs
    Notes,
    /// Write every shortcut, manual and generated, as JSON
    Export {
        #[clap(long, short = 'o', help = "File to write instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Talk to the messaging bridge
    Bridge {
        #[clap(subcommand)]
        action: BridgeCommand,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Set bridge connection details
    Bridge {
        #[clap(long)]
        api_id: Option<String>,
        #[clap(long)]
        api_hash: Option<String>,
        #[clap(long)]
        phone: Option<String>,
        #[clap(long)]
        url: Option<String>,
        #[clap(long)]
        verification_chat: Option<String>,
    },
    /// Save a named chat to send messages to
    AddContact { name: String, chat_id: String },
    /// Forget a saved chat
    RemoveContact { name: String },
}

#[derive(Subcommand)]
pub enum BridgeCommand {
    /// Log in, or check that the session is still valid
    Login,
    /// Finish a login with the code sent to the account
    SubmitCode { code: String },
    /// Send text through the bridge
    Send {
        #[clap(long, short = 'x', help = "Text to send; read from stdin when omitted")]
        text: Option<String>,

        #[clap(long, conflicts_with_all = ["chat", "verify"], help = "Saved contact name")]
        to: Option<String>,

        #[clap(long, conflicts_with = "verify", help = "Explicit chat id")]
        chat: Option<String>,

        #[clap(long, help = "Send to the verification chat with the verification marker")]
        verify: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_opens_the_notepad() {
        let args = Glassnote::try_parse_from(["glassnote"]).unwrap();
        assert!(args.commands.is_none());
    }

    #[test]
    fn add_takes_trigger_content_and_force() {
        let args =
            Glassnote::try_parse_from(["glassnote", "add", "-t", "sig", "-c", "Regards", "--force"])
                .unwrap();
        match args.commands {
            Some(Commands::Add {
                trigger,
                content,
                force,
            }) => {
                assert_eq!(trigger, "sig");
                assert_eq!(content, "Regards");
                assert!(force);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn expand_cursor_is_optional() {
        let args = Glassnote::try_parse_from(["glassnote", "expand", "--text", "/hi"]).unwrap();
        assert!(matches!(
            args.commands,
            Some(Commands::Expand { cursor: None, .. })
        ));
    }

    #[test]
    fn send_targets_are_exclusive() {
        assert!(Glassnote::try_parse_from([
            "glassnote", "bridge", "send", "--to", "finance", "--verify"
        ])
        .is_err());
        assert!(Glassnote::try_parse_from(["glassnote", "bridge", "send", "--verify"]).is_ok());
    }

    #[test]
    fn list_filters_are_exclusive() {
        assert!(Glassnote::try_parse_from(["glassnote", "list", "-g", "-a"]).is_err());
    }
}
