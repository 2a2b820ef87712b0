use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use examgen_server::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{ExamProfiles, GenerationOutput, TopicList},
    services::{
        batch_service::BatchService,
        completion_client::OpenAiCompletionClient,
        output_writer::{OutputFiles, OutputWriter},
        question_processor::{questions_text_from_file, QuestionProcessor},
        retry_controller::RetryPolicy,
        text_extractor::extract_text,
        topic_orchestrator::{LogReporter, TopicOrchestrator},
    },
};

#[derive(Debug, Parser)]
#[command(name = "examgen", version, about = "Generate validated exam questions from topic lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate questions for every topic in one topic file
    Generate {
        /// Exam profile key, see `examgen exams`
        #[arg(long)]
        exam: String,

        #[arg(long, value_name = "FILE")]
        topics: PathBuf,

        /// Questions per topic (defaults to QUESTIONS_PER_TOPIC)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
        count: Option<u32>,

        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Run every .txt, .md and .pdf topic file in a folder
    Batch {
        #[arg(long)]
        exam: String,

        #[arg(long, value_name = "DIR")]
        input: PathBuf,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
        count: Option<u32>,

        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Restructure existing free-form questions (.txt, .md, .json, .pdf)
    Process {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List available exam profiles
    Exams,
}

fn print_exams(profiles: &ExamProfiles) {
    println!("Available exam types:");
    for profile in profiles.iter() {
        println!(
            "  {:<24} {} ({}, {} points)",
            profile.key,
            profile.name,
            profile.difficulty,
            profile.points_label()
        );
    }
}

fn print_run_summary(output: &GenerationOutput, files: &OutputFiles) {
    println!();
    println!("Title:     {}", output.test_info.title);
    println!("Questions: {}", output.total_questions());
    for result in &output.topic_results {
        let status = if result.is_exhausted() { "FAILED" } else { "ok" };
        println!(
            "  [{:>6}] {} ({} questions, {} attempts)",
            status,
            result.topic,
            result.questions.len(),
            result.attempts
        );
    }
    for failed in output.failed_topics() {
        println!("  last error for \"{}\": {}", failed.topic, failed.last_error);
    }
    println!("Saved {}", files.questions_file.display());
    println!("Saved {}", files.test_info_file.display());
}

fn output_dir(output: Option<PathBuf>, config: &Config) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(&config.output_dir))
}

async fn read_topics(path: &Path) -> AppResult<TopicList> {
    let topics = TopicList::parse(&extract_text(path).await?);
    if topics.is_empty() {
        return Err(AppError::ValidationError(format!(
            "No topics found in {}",
            path.display()
        )));
    }
    Ok(topics)
}

async fn run(cli: Cli) -> AppResult<()> {
    let profiles = ExamProfiles::builtin();
    if let Command::Exams = cli.command {
        print_exams(&profiles);
        return Ok(());
    }

    let config = Config::from_env();
    config.validate()?;
    let client = OpenAiCompletionClient::new(&config);

    match cli.command {
        Command::Generate {
            exam,
            topics,
            count,
            output,
        } => {
            let profile = profiles.require(&exam)?;
            let topic_list = read_topics(&topics).await?;
            let count = count.unwrap_or(config.questions_per_topic);

            let result = TopicOrchestrator::from_config(&client, &config)
                .run(profile, &topic_list, count, &LogReporter)
                .await;
            let files = OutputWriter::new(output_dir(output, &config))
                .write_run(profile.key, &topic_list, &result)
                .await?;
            print_run_summary(&result, &files);
        }
        Command::Batch {
            exam,
            input,
            count,
            output,
        } => {
            let profile = profiles.require(&exam)?;
            let service = BatchService::new(
                TopicOrchestrator::from_config(&client, &config),
                OutputWriter::new(output_dir(output, &config)),
                config.file_delay(),
            );

            let (run, summary) = service
                .run(
                    &input,
                    profile,
                    count.unwrap_or(config.questions_per_topic),
                    &LogReporter,
                )
                .await?;

            println!();
            println!(
                "Processed {}/{} files ({}), {} topics, {} questions",
                run.processed_files,
                run.total_files,
                run.success_rate(),
                run.total_topics,
                run.total_questions
            );
            for error in &run.errors {
                println!("  file error {}: {}", error.file, error.error);
            }
            for failed in &run.failed_topics {
                println!(
                    "  failed topic {} / \"{}\": {}",
                    failed.file, failed.topic, failed.last_error
                );
            }
            println!("Summary: {}", summary.display());
        }
        Command::Process { input, output } => {
            let text = questions_text_from_file(&input).await?;
            let processed = QuestionProcessor::new(&client, RetryPolicy::from_config(&config))
                .process(&text)
                .await?;
            let files = OutputWriter::new(output_dir(output, &config))
                .write_processed(&processed)
                .await?;

            println!("Title:     {}", processed.test_info.title);
            println!("Questions: {}", processed.questions.len());
            println!("Saved {}", files.questions_file.display());
            println!("Saved {}", files.test_info_file.display());
        }
        Command::Exams => print_exams(&profiles),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
