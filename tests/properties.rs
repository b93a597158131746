use proptest::prelude::*;
use proptest::sample::Index;
use yaml_patcher::{locate, quote_value, rewrite, KeyPath, YamlEditor};

type Block = (String, Vec<(String, String)>);

fn blocks() -> impl Strategy<Value = Vec<Block>> {
    // Unique top-level keys, so every generated path resolves to its own block
    prop::collection::btree_map(
        "[a-z]{1,6}",
        prop::collection::vec(("[a-z]{1,6}", "[a-z0-9][a-z0-9.]{0,6}"), 0..4),
        1..5,
    )
    .prop_map(|map| map.into_iter().collect::<Vec<Block>>())
}

fn render_lines(blocks: &[Block]) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, children) in blocks {
        if children.is_empty() {
            lines.push(format!("{key}: leaf"));
            continue;
        }
        lines.push(format!("{key}:"));
        for (child, value) in children {
            lines.push(format!("  {child}: {value}"));
        }
    }
    lines
}

fn join(lines: &[String]) -> String {
    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}

fn pick_path(blocks: &[Block], top: Index, child: Index) -> KeyPath {
    let (key, children) = top.get(blocks);
    if children.is_empty() {
        KeyPath::from_segments([key.clone()])
    } else {
        let (child_key, _) = child.get(children.as_slice());
        KeyPath::from_segments([key.clone(), child_key.clone()])
    }
}

fn value() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9.-]{0,8}"
}

proptest! {
    #[test]
    fn rewrite_changes_only_the_target_value(
        blocks in blocks(),
        top in any::<Index>(),
        child in any::<Index>(),
        new_value in value(),
    ) {
        let doc = join(&render_lines(&blocks));
        let path = pick_path(&blocks, top, child);
        let m = locate(&doc, &path).expect("generated path resolves");

        let out = rewrite(&doc, &m, &new_value).unwrap();
        let before: Vec<&str> = doc.split('\n').collect();
        let after: Vec<&str> = out.split('\n').collect();
        prop_assert_eq!(before.len(), after.len());

        let target = m.line - 1;
        for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
            if i != target {
                prop_assert_eq!(b, a);
            }
        }

        let column = m.offset - doc[..m.offset].rfind('\n').map_or(0, |p| p + 1);
        let expected = format!(
            "{}: {}",
            &before[target][..column + m.key.len()],
            quote_value(&new_value).unwrap()
        );
        prop_assert_eq!(after[target], expected.as_str());
    }

    #[test]
    fn applying_twice_equals_applying_once(
        blocks in blocks(),
        top in any::<Index>(),
        child in any::<Index>(),
        new_value in value(),
    ) {
        let doc = join(&render_lines(&blocks));
        let path = pick_path(&blocks, top, child);

        let once = YamlEditor::parse(&doc).set_value(&path, &new_value).unwrap();
        let twice = YamlEditor::parse(&once).set_value(&path, &new_value).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn comments_and_blank_lines_do_not_change_the_match(
        blocks in blocks(),
        top in any::<Index>(),
        child in any::<Index>(),
        noise in prop::collection::vec((any::<Index>(), any::<bool>()), 0..6),
    ) {
        let lines = render_lines(&blocks);
        let path = pick_path(&blocks, top, child);

        let mut noisy = lines.clone();
        for (at, comment) in noise {
            let pos = at.index(noisy.len() + 1);
            let filler = if comment { "# note: ignore me" } else { "" };
            noisy.insert(pos, filler.to_string());
        }

        let clean_doc = join(&lines);
        let noisy_doc = join(&noisy);

        let clean = locate(&clean_doc, &path).expect("generated path resolves");
        let dirty = locate(&noisy_doc, &path).expect("still resolves with noise");

        prop_assert_eq!(&clean.key, &dirty.key);
        prop_assert_eq!(
            clean_doc.split('\n').nth(clean.line - 1),
            noisy_doc.split('\n').nth(dirty.line - 1)
        );
        prop_assert_eq!(&noisy_doc[dirty.offset..dirty.key_end()], dirty.key.as_str());
    }
}
