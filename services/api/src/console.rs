use clap::Args;
use portal_familia::error::AppError;
use portal_familia::workflows::dignometro::{
    AnswerMap, CompletenessPolicy, DignometroServiceError, QuestionCatalog, ScoreResult,
    ScoringEngine, SubmissionGuard,
};
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Answer in the form `question_id=sim|nao` (repeatable)
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, bool)>,
    /// Require an answer for every question
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) fn parse_answer(raw: &str) -> Result<(String, bool), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected question_id=sim|nao, got '{raw}'"))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }

    let answer = match value.trim().to_lowercase().as_str() {
        "sim" | "s" | "yes" | "y" | "true" | "1" => true,
        "não" | "nao" | "n" | "no" | "false" | "0" => false,
        other => return Err(format!("'{other}' is not a yes/no answer")),
    };

    Ok((id.to_string(), answer))
}

pub(crate) fn run_questions() {
    print!("{}", render_questions(&QuestionCatalog::standard()));
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let catalog = Arc::new(QuestionCatalog::standard());
    let policy = if args.strict {
        CompletenessPolicy::Strict
    } else {
        CompletenessPolicy::Permissive
    };

    let answers: AnswerMap = args.answers.into_iter().collect();
    SubmissionGuard::new(catalog.clone(), policy)
        .check(&answers)
        .map_err(DignometroServiceError::from)?;

    let engine = ScoringEngine::new(catalog);
    let result = engine.score(&answers);
    print!("{}", render_score(&engine, &answers, &result));
    Ok(())
}

fn render_questions(catalog: &QuestionCatalog) -> String {
    let total = catalog.len();
    let mut out = String::from("Dignômetro questionnaire\n");
    for (index, question) in catalog.list_questions().iter().enumerate() {
        let _ = writeln!(
            out,
            "\n[{}/{}] {} ({})\n    {}",
            index + 1,
            total,
            question.dimension,
            question.id,
            question.prompt
        );
    }
    out
}

fn render_score(engine: &ScoringEngine, answers: &AnswerMap, result: &ScoreResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score: {:.1} ({} of {} questions answered)",
        result.score,
        answers.len(),
        engine.catalog().len()
    );
    let _ = writeln!(out, "Poverty level: {}", result.poverty_level);

    let outcomes = engine.describe(&result.dimension_scores);
    if outcomes.is_empty() {
        out.push_str("\nNo answers given\n");
        return out;
    }

    out.push_str("\nDimensions\n");
    for outcome in outcomes {
        let mark = if outcome.passed { "sim" } else { "não" };
        let _ = writeln!(out, "- {}: {}", outcome.dimension, mark);
    }
    out
}
