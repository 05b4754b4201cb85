use locator_code_extractor::{CodeDefinition, DefinitionKind};
use locator_context_budget::{outline, render, serialize, serialize_with, BudgetConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn chars(text: &str) -> usize {
    text.chars().count()
}

fn definition(
    path: &str,
    name: &str,
    kind: DefinitionKind,
    start: usize,
    end: usize,
    content: String,
) -> CodeDefinition {
    CodeDefinition {
        file_path: path.to_string(),
        name: name.to_string(),
        definition_type: kind,
        start_line: start,
        end_line: end,
        signature: content.lines().next().unwrap_or_default().trim().to_string(),
        content,
    }
}

/// One class of roughly 1400 characters holding three short methods
fn service_class() -> Vec<CodeDefinition> {
    let mut lines = vec!["class ChannelService:".to_string()];
    let mut methods = Vec::new();
    for name in ["create", "rename", "archive"] {
        let start = lines.len() + 1;
        lines.push(format!("    def {name}(self, channel_id):"));
        for step in 0..8 {
            lines.push(format!("        self.log('{name} step {step}', channel_id)"));
        }
        lines.push(format!("        return self.store.{name}(channel_id)"));
        let end = lines.len();
        let content = lines[start - 1..end].join("\n").trim_start().to_string();
        methods.push(definition(
            "service.py",
            name,
            DefinitionKind::Method,
            start,
            end,
            content,
        ));
    }

    let class_content = lines.join("\n");
    let mut defs = vec![definition(
        "service.py",
        "ChannelService",
        DefinitionKind::Class,
        1,
        lines.len(),
        class_content,
    )];
    defs.extend(methods);
    defs
}

#[test]
fn oversized_class_is_reduced_to_header_and_methods() {
    let defs = service_class();
    let class = &defs[0];
    assert!(chars(&class.content) > 1000 && chars(&class.content) < 1600);

    let text = serialize(&defs, 1000, 50_000);

    assert!(!text.contains(&class.content));
    assert!(text.contains("- [class] ChannelService (lines 1-31) | class ChannelService:\nclass ChannelService:\n"));
    assert!(text.contains("// ..."));
    for method in &defs[1..] {
        assert!(chars(&method.content) <= 1000);
        assert!(text.contains(&method.content), "{} missing", method.name);
        assert!(text.contains(&format!("  - [method] {} (lines", method.name)));
    }
}

#[test]
fn budget_keeps_a_full_prefix_then_signatures() {
    let defs: Vec<_> = (0..50)
        .map(|i| {
            let start = i * 6 + 1;
            let mut content = format!("def fn_{i:02}():\n");
            for row in 0..4 {
                content.push_str(&format!("    total_{row} = compute('fn_{i:02}', {row}) + 1\n"));
            }
            content.push_str(&format!("    return 'fn_{i:02} done'"));
            definition("jobs.py", &format!("fn_{i:02}"), DefinitionKind::Function, start, start + 5, content)
        })
        .collect();
    let combined: usize = defs.iter().map(|d| chars(&d.content)).sum();
    let budget = combined / 2;

    let text = serialize(&defs, 1000, budget);
    let full: Vec<bool> = defs.iter().map(|d| text.contains(&d.content)).collect();
    let kept = full.iter().take_while(|f| **f).count();

    assert!(kept > 0 && kept < defs.len(), "kept {kept}");
    assert!(full[kept..].iter().all(|f| !f));
    for d in &defs {
        assert!(text.contains(&format!("- [function] {} (lines", d.name)));
    }
    assert!(chars(&text) <= budget, "{} > {budget}", chars(&text));
}

#[test]
fn long_leaf_is_split_into_labeled_parts() {
    let content = vec!["x".repeat(49); 50].join("\n");
    let defs = vec![definition(
        "blob.js",
        "render",
        DefinitionKind::Function,
        1,
        50,
        content,
    )];

    let text = serialize(&defs, 1000, 50_000);

    assert!(text.contains("  part 1/3\n"));
    assert!(text.contains("  part 3/3\n"));
    assert!(!text.contains("part 4/"));
    let longest_line = text.lines().map(chars).max().unwrap_or_default();
    assert!(longest_line <= 1000);
}

#[test]
fn deep_nesting_stops_recursing_at_depth_cap() {
    let defs: Vec<_> = (0..30)
        .map(|i| {
            let content = format!("class Level{i}:\n{}", "    pass\n".repeat(50));
            definition("deep.py", &format!("Level{i}"), DefinitionKind::Class, 1 + i, 200 - i, content)
        })
        .collect();
    let config = BudgetConfig {
        max_block_chars: 100,
        max_depth: 40,
        ..BudgetConfig::default()
    };

    let rendered = render(&defs, &config);

    assert_eq!(rendered.text.matches(&config.truncation_marker).count(), 5);
    for d in &defs {
        assert!(rendered.text.contains(&format!("] {} (lines", d.name)));
    }
    assert_eq!(rendered.full_units + rendered.degraded_units, defs.len());
}

#[test]
fn custom_marker_and_recursion_trigger() {
    let defs = service_class();
    let config = BudgetConfig {
        truncation_marker: "    ## methods follow".to_string(),
        min_children_for_recursion: 4,
        ..BudgetConfig::default()
    };

    let text = serialize_with(&defs, &config);

    // Three children are not enough, so the class is split instead
    assert!(!text.contains("## methods follow"));
    assert!(text.contains("part 1/2"));
}

#[test]
fn files_and_definitions_are_sorted() {
    let defs = vec![
        definition("b.py", "second", DefinitionKind::Function, 1, 1, "def second(): pass".into()),
        definition("a.py", "late", DefinitionKind::Function, 9, 9, "def late(): pass".into()),
        definition("a.py", "early", DefinitionKind::Function, 2, 2, "def early(): pass".into()),
    ];

    let text = outline(&defs, &BudgetConfig::default());

    assert_eq!(
        text,
        "## a.py\n\
         - [function] early (lines 2-2) | def early(): pass\n\
         - [function] late (lines 9-9) | def late(): pass\n\
         \n## b.py\n\
         - [function] second (lines 1-1) | def second(): pass\n"
    );
}

#[test]
fn empty_input_has_fixed_text() {
    assert_eq!(serialize(&[], 1000, 50_000), "No code definitions found.");
}

fn arb_definitions() -> impl Strategy<Value = Vec<CodeDefinition>> {
    prop::collection::vec((1usize..9, 1usize..120, any::<bool>()), 1..25).prop_map(|specs| {
        let mut defs = Vec::new();
        for (i, (line_count, width, nested)) in specs.into_iter().enumerate() {
            let start = i * 20 + 1;
            let end = start + line_count + 1;
            let body: Vec<String> = (0..=line_count + 1)
                .map(|row| format!("{}{row}", "y".repeat(width)))
                .collect();
            defs.push(definition(
                "gen.py",
                &format!("item{i}"),
                DefinitionKind::Class,
                start,
                end,
                body.join("\n"),
            ));
            if nested {
                defs.push(definition(
                    "gen.py",
                    &format!("inner{i}"),
                    DefinitionKind::Method,
                    start + 1,
                    end,
                    body[1..].join("\n"),
                ));
            }
        }
        defs
    })
}

proptest! {
    #[test]
    fn output_stays_within_budget_plus_headers(
        defs in arb_definitions(),
        max_block in 1usize..400,
        max_total in 0usize..6000,
    ) {
        let config = BudgetConfig::with_limits(max_block, max_total);
        let text = serialize_with(&defs, &config);
        let file_header = chars("## gen.py\n");

        prop_assert!(chars(&text) <= max_total + defs.len() * config.max_header_chars() + file_header);
    }

    #[test]
    fn output_grows_with_budget(
        defs in arb_definitions(),
        max_block in 1usize..400,
        low in 0usize..6000,
        extra in 0usize..6000,
    ) {
        let smaller = chars(&serialize(&defs, max_block, low));
        let larger = chars(&serialize(&defs, max_block, low + extra));

        prop_assert!(smaller <= larger);
    }
}
