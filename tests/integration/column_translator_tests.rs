/*!
 * Integration tests for in-place column translation of single files
 */

use anyhow::Result;
use std::fs;
use tabtrans::column_translator::{ColumnTranslator, FileOutcome};
use tabtrans::providers::mock::MockProvider;
use tabtrans::table::Table;

use crate::common;

fn column(table: &Table, name: &str) -> Vec<String> {
    table
        .column_values(name)
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Test a full pass over a response file with a working provider
#[tokio::test]
async fn test_translate_columns_withWorkingProvider_shouldFillTargetColumns() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_response_csv(temp_dir.path(), "hindi/responses.csv")?;
    let config = common::test_config();
    let translator = ColumnTranslator::from_config(&config);
    let provider = MockProvider::working();

    let outcome = translator
        .translate_columns(&path, &provider, &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert_eq!(
        table.headers(),
        &[
            "id",
            "initial_response",
            "final_response",
            "gtrans_initial_response",
            "gtrans_final_response"
        ]
    );
    assert_eq!(
        column(&table, "gtrans_initial_response"),
        vec!["[en] नमस्ते दुनिया", "", "[en] दूसरा"]
    );
    assert_eq!(
        column(&table, "gtrans_final_response"),
        vec!["[en] अंतिम उत्तर", "[en] खाली नहीं", ""]
    );
    assert_eq!(column(&table, "id"), vec!["1", "2", "3"]);
    assert_eq!(provider.request_count(), 4);
    assert!(provider.requests().iter().all(|r| r.source_language == "hi"));

    match outcome {
        FileOutcome::Translated {
            source_language,
            columns,
        } => {
            assert_eq!(source_language, "hi");
            assert_eq!(columns.len(), 2);
            assert_eq!(columns[0].translated, 2);
            assert_eq!(columns[1].translated, 2);
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }
    Ok(())
}

/// Test that a second run finds nothing to do
#[tokio::test]
async fn test_translate_columns_runTwice_shouldNotTranslateAgain() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_response_csv(temp_dir.path(), "bengali/responses.csv")?;
    let config = common::test_config();
    let translator = ColumnTranslator::from_config(&config);

    let first = MockProvider::working();
    translator.translate_columns(&path, &first, &config.column_pairs).await?;
    let after_first = fs::read_to_string(&path)?;

    let second = MockProvider::working();
    let outcome = translator
        .translate_columns(&path, &second, &config.column_pairs)
        .await?;

    assert_eq!(second.request_count(), 0);
    assert_eq!(outcome.rows_written(), 0);
    assert_eq!(fs::read_to_string(&path)?, after_first);
    Ok(())
}

/// Test that a translation equal to a null marker is not stored as one
#[tokio::test]
async fn test_translate_columns_withNullMarkerTranslation_shouldStoreOriginalAndStayIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "hindi/a.csv", "text\nकोई नहीं\n")?;
    let config = common::single_column_config();
    let translator = ColumnTranslator::from_config(&config);

    let first = MockProvider::working().with_custom_response(|_| "None".to_string());
    let outcome = translator
        .translate_columns(&path, &first, &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert_eq!(column(&table, "text_en"), vec!["कोई नहीं"]);
    match outcome {
        FileOutcome::Translated { columns, .. } => {
            assert_eq!(columns[0].translated, 0);
            assert_eq!(columns[0].fallbacks, 1);
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }

    let second = MockProvider::working().with_custom_response(|_| "None".to_string());
    translator
        .translate_columns(&path, &second, &config.column_pairs)
        .await?;
    assert_eq!(second.request_count(), 0);
    Ok(())
}

/// Test that a failing provider leaves the source text in the target
#[tokio::test]
async fn test_translate_columns_withFailingProvider_shouldNeverLeaveBlankTargets() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "marathi/a.csv",
        "text\nपहिले वाक्य. दुसरे वाक्य.\nएक\n",
    )?;
    let config = common::single_column_config();
    let translator = ColumnTranslator::from_config(&config);
    let provider = MockProvider::failing();

    let outcome = translator
        .translate_columns(&path, &provider, &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert_eq!(
        column(&table, "text_en"),
        vec!["पहिले वाक्य. दुसरे वाक्य.", "एक"]
    );
    match outcome {
        FileOutcome::Translated { columns, .. } => {
            assert_eq!(columns[0].fallbacks, 2);
            assert_eq!(columns[0].translated, 0);
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }
    Ok(())
}

/// Test that existing translations and null markers are handled
#[tokio::test]
async fn test_translate_columns_withPartialTargets_shouldOnlyFillNullCells() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "telugu/a.csv",
        "text,text_en\nఒకటి,kept\nరెండు,\nమూడు,nan\n",
    )?;
    let config = common::single_column_config();
    let translator = ColumnTranslator::from_config(&config);
    let provider = MockProvider::working();

    translator
        .translate_columns(&path, &provider, &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert_eq!(
        column(&table, "text_en"),
        vec!["kept", "[en] రెండు", "[en] మూడు"]
    );
    assert_eq!(provider.request_count(), 2);
    Ok(())
}

/// Test that files outside a known language directory are left untouched
#[tokio::test]
async fn test_translate_columns_withUnknownLanguageDirectory_shouldSkipWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_response_csv(temp_dir.path(), "klingon/responses.csv")?;
    let before = fs::read_to_string(&path)?;
    let config = common::test_config();
    let translator = ColumnTranslator::from_config(&config);
    let provider = MockProvider::working();

    let outcome = translator
        .translate_columns(&path, &provider, &config.column_pairs)
        .await?;

    assert!(outcome.is_skipped());
    assert_eq!(provider.request_count(), 0);
    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

/// Test that the legacy header is renamed and missing columns are tolerated
#[tokio::test]
async fn test_translate_columns_withLegacyHeader_shouldRenameAndSkipMissingColumns() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "english/a.csv",
        "id,trans_response,final_response\n1,hello,world\n",
    )?;
    let config = common::test_config();
    let translator = ColumnTranslator::from_config(&config);
    let provider = MockProvider::working();

    let outcome = translator
        .translate_columns(&path, &provider, &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert!(table.has_column("response"));
    assert!(!table.has_column("trans_response"));
    assert!(!table.has_column("gtrans_initial_response"));
    assert_eq!(column(&table, "gtrans_final_response"), vec!["[en] world"]);
    match outcome {
        FileOutcome::Translated { columns, .. } => assert_eq!(columns.len(), 1),
        other => panic!("Unexpected outcome: {:?}", other),
    }
    Ok(())
}

/// Test that rows keep their order and count
#[tokio::test]
async fn test_translate_columns_withManyRows_shouldPreserveRowOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut content = String::from("text\n");
    for i in 0..50 {
        content.push_str(&format!("row {}\n", i));
    }
    let path = common::create_test_file(temp_dir.path(), "hindi/many.csv", &content)?;
    let config = common::single_column_config();
    let translator = ColumnTranslator::from_config(&config);

    translator
        .translate_columns(&path, &MockProvider::working(), &config.column_pairs)
        .await?;

    let table = Table::load(&path)?;
    assert_eq!(table.row_count(), 50);
    let expected: Vec<String> = (0..50).map(|i| format!("[en] row {}", i)).collect();
    assert_eq!(column(&table, "text_en"), expected);
    Ok(())
}
