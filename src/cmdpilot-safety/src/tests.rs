//! Tests for the safety classifier.
//!
//! Coverage:
//! 1. Tier lookup against the default vocabularies
//! 2. First-token purity (arguments never change the tier)
//! 3. Deny-before-allow precedence
//! 4. Vocabulary construction and validation

use super::*;

// ============================================================================
// Tier Tests
// ============================================================================

mod tier_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tier_display() {
        assert_eq!(format!("{}", SafetyTier::Safe), "SAFE");
        assert_eq!(format!("{}", SafetyTier::Dangerous), "DANGEROUS");
        assert_eq!(format!("{}", SafetyTier::Unknown), "UNKNOWN");
    }

    #[test]
    fn test_tier_predicates() {
        assert!(SafetyTier::Dangerous.is_dangerous());
        assert!(!SafetyTier::Unknown.is_dangerous());
        assert!(SafetyTier::Safe.is_safe());
        assert!(!SafetyTier::Unknown.is_safe());
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&SafetyTier::Dangerous).unwrap();
        assert_eq!(json, "\"dangerous\"");
    }
}

// ============================================================================
// Default Vocabulary Tests
// ============================================================================

mod default_vocabulary_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allow_listed_commands_are_safe() {
        for program in DEFAULT_ALLOW_LIST {
            let command = format!("{program} something");
            assert_eq!(classify(&command), SafetyTier::Safe, "failed for {program}");
        }
    }

    #[test]
    fn test_deny_listed_commands_are_dangerous() {
        for program in DEFAULT_DENY_LIST {
            let command = format!("{program} something");
            assert_eq!(
                classify(&command),
                SafetyTier::Dangerous,
                "failed for {program}"
            );
        }
    }

    #[test]
    fn test_unlisted_commands_are_unknown() {
        assert_eq!(classify("npm install express"), SafetyTier::Unknown);
        assert_eq!(classify("badcmd123"), SafetyTier::Unknown);
        assert_eq!(classify("git status"), SafetyTier::Unknown);
    }

    #[test]
    fn test_empty_command_is_unknown() {
        assert_eq!(classify(""), SafetyTier::Unknown);
        assert_eq!(classify("   \t "), SafetyTier::Unknown);
    }

    #[test]
    fn test_rm_rf_root_is_dangerous() {
        assert_eq!(classify("rm -rf /"), SafetyTier::Dangerous);
    }
}

// ============================================================================
// First-Token Rule Tests
// ============================================================================

mod first_token_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_never_change_tier() {
        let classifier = SafetyClassifier::default();
        let same_program = ["rm", "rm -i notes.txt", "rm -rf /", "rm    --help"];
        let tiers: Vec<SafetyTier> = same_program
            .iter()
            .map(|c| classifier.classify(c))
            .collect();
        assert!(tiers.iter().all(|t| *t == SafetyTier::Dangerous));

        // A dangerous-looking argument does not taint a safe program.
        assert_eq!(classifier.classify("echo rm -rf /"), SafetyTier::Safe);
    }

    #[test]
    fn test_leading_whitespace_is_ignored() {
        assert_eq!(classify("   mkdir src"), SafetyTier::Safe);
        assert_eq!(classify("\tkill 1"), SafetyTier::Dangerous);
    }

    #[test]
    fn test_path_qualified_program_is_not_basenamed() {
        assert_eq!(classify("/bin/rm -rf /tmp/x"), SafetyTier::Unknown);
    }

    #[test]
    fn test_base_command() {
        assert_eq!(base_command("mkdir -p src"), Some("mkdir"));
        assert_eq!(base_command("  ls"), Some("ls"));
        assert_eq!(base_command(""), None);
    }
}

// ============================================================================
// Vocabulary Tests
// ============================================================================

mod vocabulary_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deny_wins_over_allow() {
        let vocabulary = SafetyVocabulary::new(["rm", "ls"], ["rm"]).unwrap();
        let classifier = SafetyClassifier::new(vocabulary);
        assert_eq!(classifier.classify("rm x"), SafetyTier::Dangerous);
        assert_eq!(classifier.classify("ls"), SafetyTier::Safe);
    }

    #[test]
    fn test_substituted_vocabulary() {
        let vocabulary = SafetyVocabulary::empty()
            .with_allowed("cargo")
            .with_denied("git");
        let classifier = SafetyClassifier::new(vocabulary);
        assert_eq!(classifier.classify("cargo build"), SafetyTier::Safe);
        assert_eq!(classifier.classify("git push"), SafetyTier::Dangerous);
        assert_eq!(classifier.classify("mkdir a"), SafetyTier::Unknown);
    }

    #[test]
    fn test_extended_keeps_defaults() {
        let vocabulary = SafetyVocabulary::default()
            .extended(["cargo"], ["curl"])
            .unwrap();
        assert!(vocabulary.is_allowed("cargo"));
        assert!(vocabulary.is_allowed("mkdir"));
        assert!(vocabulary.is_denied("curl"));
        assert!(vocabulary.is_denied("rm"));
    }

    #[test]
    fn test_entries_are_trimmed() {
        let vocabulary = SafetyVocabulary::new([" ls "], Vec::<&str>::new()).unwrap();
        assert!(vocabulary.is_allowed("ls"));
    }

    #[test]
    fn test_empty_entry_rejected() {
        let err = SafetyVocabulary::new(["ls", "  "], Vec::<&str>::new()).unwrap_err();
        assert_eq!(err, SafetyError::EmptyEntry { list: "allow" });
    }

    #[test]
    fn test_whitespace_entry_rejected() {
        let err = SafetyVocabulary::new(Vec::<&str>::new(), ["rm -rf"]).unwrap_err();
        assert_eq!(
            err,
            SafetyError::EntryWithWhitespace {
                list: "deny",
                entry: "rm -rf".to_string(),
            }
        );
    }

    #[test]
    fn test_listing_is_sorted() {
        let vocabulary = SafetyVocabulary::new(["touch", "cat", "ls"], ["rm"]).unwrap();
        assert_eq!(vocabulary.allowed(), vec!["cat", "ls", "touch"]);
        assert_eq!(vocabulary.denied(), vec!["rm"]);
    }
}

// ============================================================================
// Batch Classification Tests
// ============================================================================

mod classify_all_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_all_preserves_order() {
        let classifier = SafetyClassifier::default();
        let classified = classifier.classify_all(&["touch x", "rm -rf /", "npm test"]);
        assert_eq!(
            classified,
            vec![
                ClassifiedCommand {
                    command: "touch x".to_string(),
                    tier: SafetyTier::Safe,
                },
                ClassifiedCommand {
                    command: "rm -rf /".to_string(),
                    tier: SafetyTier::Dangerous,
                },
                ClassifiedCommand {
                    command: "npm test".to_string(),
                    tier: SafetyTier::Unknown,
                },
            ]
        );
    }
}
