use anyhow::Context;
use owasp_core::progress::{HINT_PENALTY, SOLUTION_PENALTY};
use owasp_core::{Game, GameState, Level, Session};
use std::io::{BufRead, Write};
use std::path::Path;

const HELP: &str = "Commands are sent to the target. Console: :hint :solution :reset :quit";

pub fn run(root: &Path, id: u32, offline: bool) -> anyhow::Result<()> {
    let game = super::connect(root, offline)?;
    let rt = tokio::runtime::Runtime::new()?;
    let level = super::load_level(&rt, &game, id)?;

    let state = GameState::load(root).context("failed to load game state")?;
    let mut console = Console {
        root,
        game: &game,
        rt: &rt,
        session: Session::new(state),
    };
    console.enter(level)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    console.run(stdin.lock(), &mut stdout)
}

/// One interactive visit to a level.
struct Console<'a> {
    root: &'a Path,
    game: &'a Game,
    rt: &'a tokio::runtime::Runtime,
    session: Session,
}

impl Console<'_> {
    fn enter(&mut self, level: Level) -> anyhow::Result<()> {
        self.session.enter_level(level);
        self.save()
    }

    fn save(&self) -> anyhow::Result<()> {
        self.session
            .state
            .save(self.root)
            .context("failed to write game state")
    }

    fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> anyhow::Result<()> {
        let Some(level) = self.session.active_level().cloned() else {
            return Ok(());
        };

        writeln!(out, "LEVEL {}: {}", level.id, level.title)?;
        writeln!(out, "{}", level.description)?;
        writeln!(out, "{HELP}")?;
        writeln!(out)?;

        loop {
            write!(out, "{}", level.console_prompt())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']);

            match line.trim() {
                "" => continue,
                ":quit" | ":q" => break,
                ":hint" => match self.session.reveal_hint(level.id) {
                    Ok(hint) => writeln!(out, "Hint: {hint} (-{HINT_PENALTY} on completion)")?,
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                ":solution" => match self.session.reveal_solution(level.id) {
                    Ok(solution) => {
                        writeln!(out, "Solution: {solution} (-{SOLUTION_PENALTY} on completion)")?
                    }
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                ":reset" => match self.session.reset_attempt(level.id) {
                    Ok(()) => writeln!(out, "Console reset.")?,
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                _ => self.submit(level.id, line, out)?,
            }
        }
        Ok(())
    }

    fn submit<W: Write>(&mut self, id: u32, command: &str, out: &mut W) -> anyhow::Result<()> {
        let ticket = match self.session.begin_submission(id, command) {
            Ok(ticket) => ticket,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                return Ok(());
            }
        };
        let result = self
            .rt
            .block_on(self.game.submit_command(command, &ticket.level));
        let awarded = self.session.finish_submission(&ticket, &result);

        for line in &result.lines {
            writeln!(out, "{line}")?;
        }
        if let Some(points) = awarded {
            self.save()?;
            writeln!(out, "+{points} points (score {})", self.session.state.score)?;
        }
        Ok(())
    }
}
