use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::error;

use validator::BreachChecker;

// no history: every line is a password
pub fn run(checker: &BreachChecker) -> eyre::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("{}", checker.help_text());

    loop {
        match rl.readline("password> ") {
            Ok(line) => match checker.validate(&line, None) {
                Ok(()) => println!("ok"),
                Err(e) => println!("{}: {}", e.code(), e),
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break
            },
            Err(err) => {
                error!("{:?}", err);
                return Err(err.into());
            }
        }
    }

    Ok(())
}
