//! Interactive command shell

use std::{sync::Arc, time::Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    error::{AppError, AppResult, ErrorKind},
    models::{BookId, StudentId},
    services::Library,
};

pub const HELP: &[&str] = &[
    "commands:",
    "liststudents - list all students",
    "listbooks - list all books",
    "borrow <student id> <book id> - record that a student borrowed a book",
    "release <book id> - record that a book was returned",
    "help - print this page",
    "quit - exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ListStudents,
    ListBooks,
    Borrow { student_id: StudentId, book_id: BookId },
    Release { book_id: BookId },
    Help,
    Quit,
}

/// Result of a command that did not fail
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    Quit,
}

fn expect_arity(args: &[&str], n: usize) -> AppResult<()> {
    if args.len() != n {
        return Err(AppError::BadRequest("invalid length of arguments".to_string()));
    }
    Ok(())
}

fn parse_id(arg: &str) -> AppResult<i64> {
    arg.parse()
        .map_err(|_| AppError::BadRequest(format!("not a number {}", arg)))
}

impl Command {
    /// Parse one input line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(name) = args.first() else {
            return Ok(None);
        };

        let command = match name.to_lowercase().as_str() {
            "liststudents" => Command::ListStudents,
            "listbooks" => Command::ListBooks,
            "borrow" => {
                expect_arity(&args, 3)?;
                Command::Borrow {
                    student_id: parse_id(args[1])?,
                    book_id: parse_id(args[2])?,
                }
            }
            "release" => {
                expect_arity(&args, 2)?;
                Command::Release {
                    book_id: parse_id(args[1])?,
                }
            }
            "help" | "print" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(AppError::BadRequest("unknown command".to_string())),
        };

        Ok(Some(command))
    }
}

pub async fn dispatch(library: &dyn Library, command: Command) -> AppResult<Reply> {
    let lines = match command {
        Command::ListStudents => {
            let students = library.list_students().await?;
            let mut lines = vec![format!("{} students", students.len())];
            lines.extend(students.iter().map(|s| match &s.borrowed {
                Some(book) => format!("{} borrowed {}", s.student, book),
                None => s.student.to_string(),
            }));
            lines
        }
        Command::ListBooks => {
            let books = library.list_books().await?;
            let mut lines = vec![format!("{} books", books.len())];
            lines.extend(books.iter().map(|b| match &b.borrower {
                Some(student) => format!("{} borrowed by {}", b.book, student),
                None => b.book.to_string(),
            }));
            lines
        }
        Command::Borrow { student_id, book_id } => {
            library.borrow_book(book_id, student_id).await?;
            Vec::new()
        }
        Command::Release { book_id } => {
            library.release_book(book_id).await?;
            Vec::new()
        }
        Command::Help => HELP.iter().map(|s| s.to_string()).collect(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Lines(lines))
}

/// Parse and run one line
pub async fn execute(library: &dyn Library, line: &str) -> AppResult<Option<Reply>> {
    match Command::parse(line)? {
        Some(command) => dispatch(library, command).await.map(Some),
        None => Ok(None),
    }
}

fn describe(err: &AppError) -> String {
    match err.kind() {
        ErrorKind::StorageFault => format!("internal error: {}", err),
        _ => err.to_string(),
    }
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(library: Arc<dyn Library>) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut stderr = tokio::io::stderr();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{}\n", HELP.join("\n")).as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = input.next_line().await? else {
            break;
        };

        let started = Instant::now();
        let outcome = execute(library.as_ref(), &line).await;
        let elapsed = started.elapsed().as_millis();

        match outcome {
            Ok(None) => {}
            Ok(Some(Reply::Quit)) => {
                stdout.write_all(b"bye\n").await?;
                break;
            }
            Ok(Some(Reply::Lines(output))) => {
                for text in output {
                    stdout.write_all(format!("{}\n", text).as_bytes()).await?;
                }
                stdout.write_all(format!("success in {}ms\n", elapsed).as_bytes()).await?;
            }
            Err(e) => {
                if e.kind() == ErrorKind::StorageFault {
                    tracing::error!("Command {:?} failed: {:?}", line, e);
                }
                stderr
                    .write_all(format!("failed in {}ms\n{}\n", elapsed, describe(&e)).as_bytes())
                    .await?;
            }
        }
    }

    stdout.flush().await?;
    Ok(())
}
