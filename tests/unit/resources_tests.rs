/*!
 * Tests for per-language resources
 */

use anyhow::Result;
use subfix::errors::{OracleError, ResourceError};
use subfix::resources::{
    LanguageResources, ReplaceList, ResourceCatalog, WordList, WordOracle, replace_list_path,
    word_list_path,
};

use crate::common;

#[test]
fn test_replaceList_fromJson_shouldKeepRuleOrder() -> Result<()> {
    let list = ReplaceList::from_json(
        r#"{"rules":[{"find":"rn","replace":"m"},{"find":"|","replace":"I","unconditional":true}]}"#,
    )?;
    assert_eq!(list.len(), 2);
    assert_eq!(list.rules()[0].find, "rn");
    assert!(!list.rules()[0].unconditional);
    assert!(list.rules()[1].unconditional);
    assert!(list.needs_dictionary());
    Ok(())
}

#[test]
fn test_catalog_loadLanguage_withTwoLetterCode_shouldUseIso6392Files() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_english_resources(temp_dir.path())?;
    assert!(replace_list_path(temp_dir.path(), "eng").is_file());
    assert!(word_list_path(temp_dir.path(), "eng").is_file());

    let mut catalog = ResourceCatalog::new();
    let resources = catalog.load_language(temp_dir.path(), "en")?;
    assert_eq!(resources.language, "eng");
    assert_eq!(resources.replace_list.as_ref().map(ReplaceList::len), Some(2));
    assert!(resources.has_oracle());

    assert!(catalog.contains("eng"));
    assert!(catalog.get("en").is_some());
    assert!(catalog.get("es").is_none());
    Ok(())
}

#[test]
fn test_catalog_loadLanguage_withBrokenJson_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "spa_replace_list.json", "{ not json")?;

    let mut catalog = ResourceCatalog::new();
    let result = catalog.load_language(temp_dir.path(), "es");
    assert!(matches!(result, Err(ResourceError::Parse { .. })));
    Ok(())
}

#[test]
fn test_languageResources_withClosureOracle_shouldConsultIt() {
    let resources = LanguageResources::new("eng").with_oracle(|word: &str| -> Result<bool, OracleError> {
        match word {
            "" => Err(OracleError::Lookup {
                word: word.to_string(),
                message: "empty word".to_string(),
            }),
            _ => Ok(word == "italic"),
        }
    });
    let oracle = resources.oracle().unwrap();
    assert_eq!(oracle.contains("italic"), Ok(true));
    assert_eq!(oracle.contains("ita/ic"), Ok(false));
    assert!(oracle.contains("").is_err());
}

#[test]
fn test_wordList_shouldIgnoreCase() {
    let words = WordList::from_words(["Trouble"]);
    assert_eq!(words.contains("trouble"), Ok(true));
    assert_eq!(words.contains("TROUBLE"), Ok(true));
    assert_eq!(words.contains("troubIe"), Ok(false));
}
