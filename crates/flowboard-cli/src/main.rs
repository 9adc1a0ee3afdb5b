use std::sync::Arc;

use anyhow::Context;
use flowboard_core::app::{BoardHandle, PlannerBuilder, PlannerConfig};
use flowboard_core::domain::{ColumnId, FlowStatus, Priority};
use flowboard_core::impls::{TokioTicker, TracingEventSink};
use flowboard_core::planner::BoardSnapshot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 進捗バーを 1 行で描く
fn render_progress(label: &str, status: FlowStatus) {
    if let Some(percent) = status.percent() {
        let filled = usize::from(percent) / 5;
        println!("{label:<10} [{:<20}] {percent:>3}%", "#".repeat(filled));
    }
}

/// フローが Idle に戻るまで進捗を表示し続ける
async fn follow(
    handle: &BoardHandle,
    label: &str,
    pick: fn(&BoardSnapshot) -> FlowStatus,
) -> anyhow::Result<()> {
    let mut rx = handle.subscribe();
    let mut last = None;
    loop {
        let status = pick(&rx.borrow_and_update());
        if status.percent() != last {
            render_progress(label, status);
            last = status.percent();
        }
        if status.is_idle() {
            return Ok(());
        }
        rx.changed().await.context("runtime stopped while following progress")?;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowboard_core=info,flowboard_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // (A) 設定を読み込む（引数があれば JSON ファイル）
    let config = match std::env::args().nth(1) {
        Some(path) => PlannerConfig::from_path(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PlannerConfig::default(),
    };

    // (B) ランタイムを起動
    let (handle, join) = PlannerBuilder::new()
        .config(config)
        .event_sink(Arc::new(TracingEventSink))
        .spawn(TokioTicker)?;
    info!("board ready");

    // (C) タスク作成（作成ダイアログ経由）
    handle.open_create_dialog().await?;
    handle.create_task("Fix bug", Priority::High).await?;
    if let Err(e) = handle.create_task("Duplicate submit", Priority::Low).await {
        println!("second submit ignored: {e}");
    }
    follow(&handle, "creating", |s| s.creation).await?;

    let snapshot = handle.snapshot();
    let task_id = snapshot
        .column(ColumnId::Todo)
        .tasks()
        .last()
        .map(|t| t.id())
        .context("created task is missing from todo")?;

    // (D) 詳細パネルでコメントと添付
    handle.select(task_id).await?;
    handle.comment_on_selected("Reproduced on staging").await?;
    handle.attach_to_selected("spec.pdf").await?;
    follow(&handle, "uploading", |s| s.upload).await?;

    // (E) done まで進める
    handle.move_task(task_id, ColumnId::Todo).await?;
    handle.move_task(task_id, ColumnId::Doing).await?;
    handle.close_detail().await?;

    let snapshot = handle.snapshot();
    for column in snapshot.board.columns() {
        println!("{} ({})", column.title(), column.len());
        for task in column.tasks() {
            println!(
                "  - [{}] {}  comments={} attachments={:?}",
                task.priority(),
                task.content(),
                task.comments().len(),
                task.attachments()
            );
        }
    }
    println!("completion: {}%", snapshot.completion_percent);
    println!("{}", serde_json::to_string_pretty(&*snapshot)?);

    // (F) ハンドルを落とすとランタイムが止まる
    drop(handle);
    let planner = join.await?;
    info!(tasks = planner.board().total_tasks(), "board runtime joined");
    Ok(())
}
