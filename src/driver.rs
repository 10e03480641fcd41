use std::io::{self, BufRead, Write};

use collections::{CircularQueue, ProbingTable, Record};
use log::{debug, trace, warn};

use crate::command::{Command, QueueCommand, TableCommand, parse_line};

/// Reads commands line by line until the finish command or EOF.
///
/// Malformed lines are reported on `diag` and skipped,
/// every other command is handed to `apply`
fn repl<C, R, W, E, F>(input: R, out: &mut W, diag: &mut E, mut apply: F) -> io::Result<()>
where
    C: Command,
    R: BufRead,
    W: Write,
    E: Write,
    F: FnMut(C, &mut W) -> io::Result<()>,
{
    for line in input.lines() {
        let line = line?;
        match parse_line::<C>(&line) {
            Ok(None) => continue,
            Ok(Some(cmd)) if cmd.is_finish() => {
                trace!(target: "repl", "finish command");
                return Ok(());
            }
            Ok(Some(cmd)) => apply(cmd, out)?,
            Err(e) => {
                warn!(target: "repl", "skipping line {line:?}: {e}");
                writeln!(diag, "{e}")?;
            }
        }
    }

    trace!(target: "repl", "EOF");
    Ok(())
}

/// Runs the probing table REPL, printing the table once more when it finishes
pub fn run_table<R, W, E>(
    table: &mut ProbingTable,
    input: R,
    out: &mut W,
    diag: &mut E,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    repl(input, out, diag, |cmd: TableCommand, out| match cmd {
        TableCommand::Insert(record) => {
            let key = record.key.clone();
            match table.insert_record(record) {
                Ok(()) => {
                    debug!(target: "run_table", "inserted {key}, {}/{} slots", table.len(), table.capacity());
                    Ok(())
                }
                Err(e) => writeln!(out, "{e}"),
            }
        }
        TableCommand::Remove(key) => match table.remove(&key) {
            Ok(_) => Ok(()),
            Err(e) => writeln!(out, "{e}"),
        },
        TableCommand::Lookup(key) => match table.lookup(&key) {
            Ok(value) => writeln!(out, "{value}"),
            Err(e) => writeln!(out, "{e}"),
        },
        TableCommand::Print => writeln!(out, "{table}"),
        TableCommand::Finish => Ok(()),
    })?;

    writeln!(out, "{table}")?;
    out.flush()
}

/// Runs the queue REPL, draining and printing what is left when it finishes
pub fn run_queue<R, W, E>(
    queue: &mut CircularQueue<Record>,
    input: R,
    out: &mut W,
    diag: &mut E,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    repl(input, out, diag, |cmd: QueueCommand, out| match cmd {
        QueueCommand::Enqueue(record) => match queue.enqueue(record) {
            Ok(()) => Ok(()),
            Err(e) => writeln!(out, "{e}"),
        },
        QueueCommand::Dequeue => match queue.dequeue() {
            Ok(record) => writeln!(out, "{record}"),
            Err(e) => writeln!(out, "{e}"),
        },
        QueueCommand::Clear => {
            debug!(target: "run_queue", "clearing {} records", queue.len());
            queue.clear();
            Ok(())
        }
        QueueCommand::Peek => match queue.peek() {
            Ok(record) => writeln!(out, "{record}"),
            Err(e) => writeln!(out, "{e}"),
        },
        QueueCommand::Finish => Ok(()),
    })?;

    while let Ok(record) = queue.dequeue() {
        writeln!(out, "{record}")?;
    }
    writeln!(out)?;
    out.flush()
}
