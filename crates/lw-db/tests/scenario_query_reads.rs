// Read API: exact-date attention listing, inclusive disposition window
// containment, and the capped descending history the classifier consumes.
// DB-backed, skipped if LW_DATABASE_URL is not set.

use anyhow::Result;
use chrono::NaiveDate;
use lw_feed::{AttentionRecord, DispositionRecord};

fn attention(code: &str, name: &str, date: &str) -> AttentionRecord {
    AttentionRecord {
        code: code.to_string(),
        name: name.to_string(),
        date: date.to_string(),
        reason: "處置注意".to_string(),
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn attention_on_returns_only_that_date_with_names() -> Result<()> {
    let url = match std::env::var(lw_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: LW_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    lw_db::migrate(&pool).await?;

    // 0850110 / 0850111 = 1996-01-10 / 1996-01-11.
    let batch = vec![
        attention("9821", "庚公司", "0850110"),
        attention("9822", "辛公司", "0850110"),
        attention("9821", "庚公司", "0850111"),
    ];
    lw_db::merge_attention(&pool, &batch).await?;

    let listings = lw_db::query::attention_on(&pool, d(1996, 1, 10)).await?;
    let ours: Vec<_> = listings
        .iter()
        .filter(|l| l.event.code == "9821" || l.event.code == "9822")
        .collect();

    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].event.code, "9821", "ordered by code");
    assert_eq!(ours[0].name, "庚公司");
    assert_eq!(ours[1].event.code, "9822");
    assert!(ours.iter().all(|l| l.event.date == d(1996, 1, 10)));

    Ok(())
}

#[tokio::test]
async fn dispositions_covering_is_inclusive_on_both_bounds() -> Result<()> {
    let url = match std::env::var(lw_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: LW_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    lw_db::migrate(&pool).await?;

    let rec = DispositionRecord {
        code: "9823".to_string(),
        start_date: d(1996, 2, 1),
        end_date: d(1996, 2, 14),
        measures: "分盤交易".to_string(),
    };
    lw_db::merge_dispositions(&pool, &[rec]).await?;

    let covered = |date| {
        let pool = &pool;
        async move {
            lw_db::query::dispositions_covering(pool, date)
                .await
                .map(|rows| rows.iter().any(|r| r.interval.code == "9823"))
        }
    };

    assert!(covered(d(1996, 2, 1)).await?, "start bound inclusive");
    assert!(covered(d(1996, 2, 7)).await?, "middle of window");
    assert!(covered(d(1996, 2, 14)).await?, "end bound inclusive");
    assert!(!covered(d(1996, 1, 31)).await?, "day before window");
    assert!(!covered(d(1996, 2, 15)).await?, "day after window");

    Ok(())
}

#[tokio::test]
async fn recent_attention_dates_is_descending_capped_and_reference_bounded() -> Result<()> {
    let url = match std::env::var(lw_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: LW_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    lw_db::migrate(&pool).await?;

    // 35 daily events across March/April 1996 (0850301..).
    let mut batch = Vec::new();
    let mut day = d(1996, 3, 1);
    for _ in 0..35 {
        let raw = format!("085{}", day.format("%m%d"));
        batch.push(attention("9824", "壬公司", &raw));
        day = day.succ_opt().unwrap();
    }
    lw_db::merge_attention(&pool, &batch).await?;

    // Reference inside the series: later events must not appear.
    let reference = d(1996, 3, 20);
    let dates = lw_db::query::recent_attention_dates(&pool, "9824", reference, 30).await?;

    assert_eq!(dates.len(), 20, "20 events at or before the reference");
    assert_eq!(dates[0], reference, "newest first");
    assert!(dates.windows(2).all(|w| w[0] > w[1]), "strictly descending");

    // Cap applies when more history exists than the limit.
    let all = lw_db::query::recent_attention_dates(&pool, "9824", d(1996, 12, 31), 30).await?;
    assert_eq!(all.len(), 30);

    Ok(())
}

#[tokio::test]
async fn recently_flagged_codes_is_distinct_and_windowed() -> Result<()> {
    let url = match std::env::var(lw_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: LW_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    lw_db::migrate(&pool).await?;

    let batch = vec![
        attention("9825", "癸公司", "0850601"),
        attention("9825", "癸公司", "0850602"),
        attention("9826", "子公司", "0850520"),
    ];
    lw_db::merge_attention(&pool, &batch).await?;

    let codes = lw_db::query::recently_flagged_codes(&pool, d(1996, 6, 1)).await?;
    assert!(codes.iter().filter(|c| c.as_str() == "9825").count() == 1);
    assert!(!codes.contains(&"9826".to_string()), "flagged before the window");

    Ok(())
}
