use super::ui;
use crate::core::{
    CurrencyPair, EditOutcome, EditStream, FxError, PairSynchronizer, Side, SyncEvent,
};
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

const HELP: &str = "Commands:
  from <amount>      edit the 'from' amount
  to <amount>        edit the 'to' amount
  pick from|to CODE  switch a side to another currency
  show               print the current pair
  help               print this help
  quit               leave without waiting for pending edits";

#[derive(Debug, PartialEq)]
enum Command {
    Edit(Side, String),
    Pick(Side, String),
    Show,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()?.to_lowercase().as_str() {
        "from" => Command::Edit(Side::From, words.next().unwrap_or_default().to_string()),
        "to" => Command::Edit(Side::To, words.next().unwrap_or_default().to_string()),
        "pick" => match (words.next().map(str::parse::<Side>), words.next()) {
            (Some(Ok(side)), Some(code)) => Command::Pick(side, code.to_uppercase()),
            _ => Command::Unknown(line.trim().to_string()),
        },
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    };
    Some(command)
}

fn print_event(event: &SyncEvent) {
    match event {
        SyncEvent::Applied { side, .. } => debug!(side = %side, "Conversion applied"),
        SyncEvent::Superseded { side } => debug!(side = %side, "Conversion superseded"),
        SyncEvent::Failed { side, error } => println!(
            "{}",
            ui::style_text(
                &format!("Conversion from '{side}' failed: {error}"),
                ui::StyleType::Error
            )
        ),
    }
}

fn print_pick_result(result: Result<Result<EditOutcome, FxError>, JoinError>) {
    match result {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        Err(e) if e.is_cancelled() => {}
        Err(e) => println!(
            "{}",
            ui::style_text(&format!("Currency switch failed: {e}"), ui::StyleType::Error)
        ),
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(sync: Arc<PairSynchronizer>, window: Duration) -> Result<()> {
    println!("{}", ui::style_text("fxpair interactive", ui::StyleType::Title));
    println!("{}\n", ui::style_text(HELP, ui::StyleType::Subtle));
    println!("{}", ui::pair_table(&sync.pair()));

    run_session(sync, window, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

/// Drives an edit session from `input` and returns the pair it ended with.
///
/// End of input lets pending edits finish; `quit` abandons them.
pub async fn run_session<R>(
    sync: Arc<PairSynchronizer>,
    window: Duration,
    input: R,
) -> Result<CurrencyPair>
where
    R: AsyncBufRead + Unpin,
{
    let (stream, mut events) = EditStream::new(Arc::clone(&sync), window);
    let mut converting = sync.subscribe_converting();
    let mut pair_updates = sync.subscribe();
    let mut picks = JoinSet::new();
    let mut spinner: Option<ProgressBar> = None;
    let mut lines = input.lines();
    let mut flush = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    None => {}
                    Some(Command::Edit(side, raw)) => {
                        if let Err(e) = stream.push(side, &raw) {
                            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                        }
                    }
                    Some(Command::Pick(side, code)) => {
                        let sync = Arc::clone(&sync);
                        picks.spawn(async move { sync.select_currency(side, &code).await });
                    }
                    Some(Command::Show) => println!("{}", ui::pair_table(&sync.pair())),
                    Some(Command::Help) => println!("{HELP}"),
                    Some(Command::Quit) => {
                        flush = false;
                        break;
                    }
                    Some(Command::Unknown(text)) => println!(
                        "{}",
                        ui::style_text(&format!("Unknown command: {text}"), ui::StyleType::Error)
                    ),
                }
            }
            Some(event) = events.recv() => print_event(&event),
            Some(result) = picks.join_next() => print_pick_result(result),
            Ok(()) = pair_updates.changed() => {
                let pair = pair_updates.borrow_and_update().clone();
                println!("{}", ui::pair_table(&pair));
            }
            Ok(()) = converting.changed() => {
                let is_converting = *converting.borrow_and_update();
                match (is_converting, spinner.take()) {
                    (true, None) => spinner = Some(ui::new_spinner("Converting...")),
                    (true, Some(active)) => spinner = Some(active),
                    (false, Some(active)) => active.finish_and_clear(),
                    (false, None) => {}
                }
            }
        }
    }

    if flush {
        stream.finish().await;
        while let Some(result) = picks.join_next().await {
            print_pick_result(result);
        }
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
        if pair_updates.has_changed().unwrap_or(false) {
            println!("{}", ui::pair_table(&pair_updates.borrow_and_update()));
        }
    } else {
        stream.close();
        picks.shutdown().await;
    }
    if let Some(active) = spinner {
        active.finish_and_clear();
    }

    Ok(sync.pair())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::tests::{MockRateProvider, synchronizer};
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(""), None);
        assert_eq!(
            parse_command("from 12.5"),
            Some(Command::Edit(Side::From, "12.5".to_string()))
        );
        assert_eq!(
            parse_command("TO"),
            Some(Command::Edit(Side::To, String::new()))
        );
        assert_eq!(
            parse_command("pick to eur"),
            Some(Command::Pick(Side::To, "EUR".to_string()))
        );
        assert_eq!(
            parse_command("pick left eur"),
            Some(Command::Unknown("pick left eur".to_string()))
        );
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(
            parse_command("swap"),
            Some(Command::Unknown("swap".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_applies_last_edit_at_end_of_input() {
        let (sync, rates) = synchronizer(MockRateProvider::with_rate("USD", "GBP", 0.5));
        let input: &[u8] = b"from 1\nfrom 12\nfrom 12x\nfrom 12.5\n";

        let pair = run_session(sync, Duration::from_millis(200), input)
            .await
            .unwrap();

        assert_eq!(pair.from.amount, Some(12.5));
        assert_eq!(pair.to.amount, Some(6.25));
        assert_eq!(rates.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_quit_abandons_pending_edits() {
        let (sync, rates) = synchronizer(MockRateProvider::with_rate("USD", "GBP", 0.5));
        let input: &[u8] = b"from 40\nquit\nfrom 50\n";

        let pair = run_session(sync, Duration::from_millis(200), input)
            .await
            .unwrap();

        assert_eq!(pair.to.amount, None);
        assert!(rates.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_pick_switches_currency() {
        let mut rates = MockRateProvider::with_rate("USD", "GBP", 0.5);
        rates.rates.insert("EURGBP".to_string(), 0.85);
        let (sync, rates) = synchronizer(rates);
        let input: &[u8] = b"pick from eur\n";

        let pair = run_session(sync, Duration::from_millis(200), input)
            .await
            .unwrap();

        // Picking a side makes it the source: EUR 100 is converted into GBP.
        assert_eq!(pair.from.code, "EUR");
        assert_eq!(pair.from.amount, Some(100.0));
        assert_eq!(pair.to.amount, Some(85.0));
        assert_eq!(rates.calls(), vec![(100.0, "EUR".to_string(), "GBP".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reads_input_while_pick_converts() {
        let mut rates = MockRateProvider::with_rate("USD", "GBP", 0.5)
            .delay_for(100.0, Duration::from_millis(1000));
        rates.rates.insert("EURGBP".to_string(), 0.85);
        let (sync, rates) = synchronizer(rates);
        let (mut writer, reader) = tokio::io::duplex(64);
        let started = tokio::time::Instant::now();
        tokio::spawn(async move {
            writer.write_all(b"pick from eur\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            writer.write_all(b"quit\n").await.unwrap();
        });

        let pair = run_session(sync.clone(), Duration::from_millis(200), BufReader::new(reader))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(1000));
        assert_eq!(rates.calls().len(), 1);
        assert_eq!(pair.from.code, "EUR");
        assert_eq!(pair.to.amount, None);
        assert!(!sync.is_converting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reports_unknown_pick() {
        let (sync, rates) = synchronizer(MockRateProvider::with_rate("USD", "GBP", 0.5));
        let input: &[u8] = b"pick to xyz\n";

        let pair = run_session(sync, Duration::from_millis(200), input)
            .await
            .unwrap();

        assert_eq!(pair.to.code, "GBP");
        assert!(rates.calls().is_empty());
    }
}
