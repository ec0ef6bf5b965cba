use std::io::{self, BufRead, Write};

use defense_core::correct_answer_display;
use defense_core::model::{BlockId, Phase, QuestionKind};
use services::{
    GameLauncher, ResumePreview, SessionEngine, SessionProgress, feedback_line, review_items,
};

use crate::input::parse_answer;

/// Line-oriented front end over any reader/writer pair.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the game until the player quits or input ends.
    ///
    /// A session interrupted mid-pass stays saved and is offered again on the
    /// next launch.
    pub async fn play(
        &mut self,
        engine: &mut SessionEngine,
        launcher: &GameLauncher,
        mut requested: Option<BlockId>,
    ) -> anyhow::Result<()> {
        if let Some(pending) = launcher.pending_resume(engine) {
            write_resume_preview(&mut self.output, &pending.preview)?;
            match self.ask("[C]ONTINUE SESSION / [N]EW GAME > ")? {
                None => return Ok(()),
                Some(choice) if choice.eq_ignore_ascii_case("n") => launcher.new_game(engine),
                Some(_) => launcher.resume(engine, pending)?,
            }
        }

        loop {
            let keep_going = match engine.phase() {
                Phase::Menu => {
                    let block = match requested.take() {
                        Some(block) => Some(block),
                        None => self.select_sector(launcher).await?,
                    };
                    match block {
                        Some(block) => {
                            self.launch(engine, launcher, block).await?;
                            true
                        }
                        None => false,
                    }
                }
                Phase::Playing => self.play_question(engine)?,
                Phase::Win | Phase::GameOver => self.debrief(engine)?,
                Phase::ReviewErrors => self.review(engine)?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    async fn select_sector(&mut self, launcher: &GameLauncher) -> io::Result<Option<BlockId>> {
        writeln!(self.output, "SELECT SECTOR TO DEFEND")?;
        match launcher.list_blocks().await {
            Ok(blocks) => {
                for block in blocks {
                    writeln!(self.output, "  [SECTOR {block}]")?;
                }
            }
            Err(err) => writeln!(self.output, "ERROR: {err}")?,
        }

        loop {
            let Some(line) = self.ask("SECTOR (Q TO QUIT) > ")? else {
                return Ok(None);
            };
            if line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match line.parse::<BlockId>() {
                Ok(block) => return Ok(Some(block)),
                Err(_) => writeln!(self.output, "ERROR: invalid sector `{line}`")?,
            }
        }
    }

    async fn launch(
        &mut self,
        engine: &mut SessionEngine,
        launcher: &GameLauncher,
        block: BlockId,
    ) -> io::Result<()> {
        match launcher.start_block(engine, block).await {
            Ok(started) => {
                let topic = started.meta.and_then(|meta| meta.topic);
                match topic {
                    Some(topic) => writeln!(
                        self.output,
                        "SECTOR {} LOADED: {topic} ({} QUESTIONS)",
                        started.block, started.total_questions
                    ),
                    None => writeln!(
                        self.output,
                        "SECTOR {} LOADED ({} QUESTIONS)",
                        started.block, started.total_questions
                    ),
                }
            }
            Err(err) => writeln!(self.output, "ERROR: {err}"),
        }
    }

    fn play_question(&mut self, engine: &mut SessionEngine) -> anyhow::Result<bool> {
        let Some(question) = engine.current_question().cloned() else {
            engine.reset_game();
            return Ok(true);
        };
        // A resumed session may stop on a graded question; only the advance is left.
        if engine.state().current_answered() {
            engine.move_to_next_question()?;
            return Ok(true);
        }
        let progress = SessionProgress::from_state(engine.state());
        writeln!(self.output)?;
        writeln!(
            self.output,
            "QUESTION {} / {} ({} REMAINING)",
            progress.question_number, progress.total, progress.remaining
        )?;
        writeln!(self.output, "{}", question.text)?;
        if let Some(context) = &question.image_context {
            writeln!(self.output, "[CONTEXT] {context}")?;
        }
        if question.kind.is_choice() {
            for option in &question.options {
                writeln!(self.output, "  [{}] {}", option.id, option.text)?;
            }
        }
        let hint = match question.kind {
            QuestionKind::SingleChoice => "ENTER ONE OPTION",
            QuestionKind::MultipleChoice => "ENTER ALL MATCHING OPTIONS, COMMA SEPARATED",
            QuestionKind::TextInput | QuestionKind::Unknown => "TYPE YOUR ANSWER",
        };

        let Some(line) = self.ask(&format!("{hint} > "))? else {
            return Ok(false);
        };
        let outcome = engine.submit_answer(parse_answer(&question, &line), &question)?;
        writeln!(self.output, "{}", feedback_line(&outcome))?;
        if !outcome.is_correct {
            writeln!(
                self.output,
                "CORRECT ANSWER: {}",
                correct_answer_display(&question)
            )?;
            if let Some(explanation) = &question.explanation {
                writeln!(self.output, "EXPLANATION: {explanation}")?;
            }
        }
        engine.move_to_next_question()?;
        Ok(true)
    }

    fn debrief(&mut self, engine: &mut SessionEngine) -> anyhow::Result<bool> {
        let state = engine.state();
        let banner = if state.phase == Phase::Win {
            "SYSTEM SECURED"
        } else {
            "SYSTEM COMPROMISED"
        };
        let has_failures = !state.wrong_answers.is_empty();
        writeln!(self.output)?;
        writeln!(self.output, "{banner}")?;
        writeln!(self.output, "ACCURACY: {:.0}%", state.accuracy * 100.0)?;
        writeln!(
            self.output,
            "SCORE: {} / {}",
            state.score,
            state.total_questions()
        )?;
        if has_failures {
            writeln!(
                self.output,
                "[R]EVIEW ERRORS  [T] RETRY FAILURES  [M]ENU  [Q]UIT"
            )?;
        } else {
            writeln!(self.output, "[M]ENU  [Q]UIT")?;
        }

        let Some(choice) = self.ask("> ")? else {
            return Ok(false);
        };
        match choice.to_ascii_lowercase().as_str() {
            "r" if has_failures => engine.go_to_review()?,
            "t" if has_failures => {
                engine.retry_wrong_questions();
            }
            "m" => engine.reset_game(),
            "q" => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    fn review(&mut self, engine: &mut SessionEngine) -> io::Result<bool> {
        let items = review_items(engine.state());
        writeln!(self.output)?;
        writeln!(self.output, "ERROR LOG REVIEW")?;
        if items.is_empty() {
            writeln!(self.output, "NO ERRORS RECORDED. SYSTEM CLEAN.")?;
        }
        for item in &items {
            writeln!(self.output, "{}: {}", item.label, item.question_text)?;
            writeln!(self.output, "  YOUR ANSWER: {}", item.user_answer)?;
            writeln!(self.output, "  CORRECT ANSWER: {}", item.correct_answer)?;
            if let Some(explanation) = &item.explanation {
                writeln!(self.output, "  EXPLANATION: {explanation}")?;
            }
        }
        writeln!(self.output, "[T] RETRY FAILED QUESTIONS  [M]ENU  [Q]UIT")?;

        let Some(choice) = self.ask("> ")? else {
            return Ok(false);
        };
        match choice.to_ascii_lowercase().as_str() {
            "t" => {
                if !engine.retry_wrong_questions() {
                    writeln!(self.output, "NO FAILURES LEFT TO RETRY")?;
                    engine.reset_game();
                }
            }
            "m" => engine.reset_game(),
            "q" => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    /// Prompt and read one trimmed line; `None` once input is exhausted.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }
}

pub fn write_resume_preview(out: &mut impl Write, preview: &ResumePreview) -> io::Result<()> {
    writeln!(out, "SESSION DETECTED")?;
    if let Some(block) = preview.block {
        writeln!(out, "SECTOR: {block}")?;
    }
    writeln!(
        out,
        "PROGRESS: {} / {} ({}%)",
        preview.question_number, preview.total, preview.progress_percent
    )?;
    writeln!(out, "SCORE: {} / {}", preview.score, preview.total)?;
    writeln!(out, "SAVED: {}", preview.saved_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    if let Some(excerpt) = &preview.current_excerpt {
        writeln!(out, "CURRENT QUESTION: {excerpt}...")?;
    }
    Ok(())
}
