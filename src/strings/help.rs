//! # Help Text
//!
//! Help message for bot commands, displayed via the `help` command.
//! `{p}` is replaced with the configured command prefix.

const MAIN: &str = concat!(
    "**🇯🇲 Bombocord Commands**\n",
    "\n",
    "**🗣️ Patois**\n",
    "* `{p}bombocord [message]`: Translate message to Jamaican patois (or reply to a message)\n",
    "* `{p}talk [message]`: Chat wid Bombocord in patois\n",
    "* `{p}entalk [message]`: Chat wid Bombocord in English\n",
    "\n",
    "**📖 Dictionary**\n",
    "* `{p}[key]`: Access a custom copypasta\n",
    "* `{p}list`: List all dictionary keys\n",
    "* `{p}roulette`: Get a random Jamaican phrase\n",
    "\n",
    "**🔒 Admin**\n",
    "* `{p}ja [key] [value]`: Add new Jamaican phrase\n",
    "* `{p}jr [key]`: Remove Jamaican phrase (asks for confirmation)\n",
    "* `{p}je [key] [value]`: Edit existing phrase (asks for confirmation)\n"
);

pub fn main_help(prefix: &str) -> String {
    MAIN.replace("{p}", prefix)
}
