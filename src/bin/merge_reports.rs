//! Concatenate the monthly stipend report PDFs into one document.
//!
//! The input list and output name are fixed; run it from the directory
//! holding the reports. Any unreadable input aborts the run before the
//! output file is created.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

/// Reports to merge, in output order.
const INPUT_FILES: &[&str] = &[
    "receipt_october.pdf",
    "transport_allowance_october.pdf",
    "attendance_sheet_october.pdf",
];

const OUTPUT_FILE: &str = "stipend_report_october.pdf";

fn main() -> Result<()> {
    env_logger::init();

    let inputs: Vec<PathBuf> = INPUT_FILES.iter().map(PathBuf::from).collect();
    let mut merged = merge_documents(&inputs)?;
    merged
        .save(OUTPUT_FILE)
        .with_context(|| format!("writing {OUTPUT_FILE}"))?;

    println!(
        "Merged {} files into {OUTPUT_FILE} ({} pages).",
        inputs.len(),
        merged.get_pages().len()
    );
    Ok(())
}

/// Append the pages of every input, in list order, into one document.
///
/// All inputs are loaded before any output object is built, so a missing or
/// corrupt file fails the run with nothing written to disk.
fn merge_documents(inputs: &[PathBuf]) -> Result<Document> {
    let mut loaded = Vec::with_capacity(inputs.len());
    for path in inputs {
        let doc = Document::load(path)
            .with_context(|| format!("reading {}", path.display()))?;
        log::info!("loaded {} ({} pages)", path.display(), doc.get_pages().len());
        loaded.push(doc);
    }

    let mut next_id = 1u32;
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut page_ids: Vec<ObjectId> = Vec::new();
    // Inheritable attributes hoisted from the source page trees (Resources,
    // MediaBox, ...); later documents override earlier ones.
    let mut inherited = Dictionary::new();

    for mut doc in loaded {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        // get_pages is keyed by page number, so in-document order survives.
        page_ids.extend(doc.get_pages().into_values());

        for (id, object) in std::mem::take(&mut doc.objects) {
            match object_type(&object) {
                // The merged document gets a single new catalog and page tree.
                Some(b"Catalog") | Some(b"Outlines") | Some(b"Outline") => {}
                Some(b"Pages") => {
                    if let Ok(dict) = object.as_dict() {
                        for (key, value) in dict.iter() {
                            match key.as_slice() {
                                b"Type" | b"Kids" | b"Count" | b"Parent" => {}
                                _ => inherited.set(key.clone(), value.clone()),
                            }
                        }
                    }
                }
                _ => {
                    objects.insert(id, object);
                }
            }
        }
    }

    let pages_root_id: ObjectId = (next_id, 0);
    let catalog_id: ObjectId = (next_id + 1, 0);

    for page_id in &page_ids {
        if let Some(Object::Dictionary(dict)) = objects.get_mut(page_id) {
            dict.set("Parent", pages_root_id);
        }
    }

    let mut pages_root = inherited;
    pages_root.set("Type", "Pages");
    pages_root.set("Count", page_ids.len() as i64);
    pages_root.set(
        "Kids",
        page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<Object>>(),
    );

    let mut merged = Document::with_version("1.5");
    merged.objects = objects;
    merged
        .objects
        .insert(pages_root_id, Object::Dictionary(pages_root));
    merged.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_root_id,
        }),
    );
    merged.trailer.set("Root", catalog_id);
    merged.max_id = next_id + 1;
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}

fn object_type(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|value| value.as_name().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// Build a minimal single-tree PDF with `page_count` labeled pages.
    fn sample_pdf(page_count: usize, label: &str) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_no in 0..page_count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("{label} page {page_no}"))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encoding test content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => page_count as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn merge_keeps_every_page_in_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let specs = [("alpha", 2usize), ("beta", 3), ("gamma", 1)];

        let mut inputs = Vec::new();
        for (label, page_count) in specs {
            let path = dir.path().join(format!("{label}.pdf"));
            sample_pdf(page_count, label).save(&path).expect("saving sample");
            inputs.push(path);
        }

        let merged = merge_documents(&inputs).expect("merge");
        let pages = merged.get_pages();
        assert_eq!(pages.len(), 6);

        // input-list order: alpha 0, alpha 1, beta 0..2, gamma 0
        let expected = [
            "alpha page 0",
            "alpha page 1",
            "beta page 0",
            "beta page 1",
            "beta page 2",
            "gamma page 0",
        ];
        for (page_no, marker) in (1u32..).zip(expected) {
            let page_id = pages[&page_no];
            let content = merged.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content);
            assert!(
                text.contains(marker),
                "page {page_no} should contain '{marker}'"
            );
        }
    }

    #[test]
    fn missing_input_aborts_with_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("good.pdf");
        sample_pdf(1, "good").save(&good).expect("saving sample");

        let inputs = vec![good, dir.path().join("does_not_exist.pdf")];
        assert!(merge_documents(&inputs).is_err());
    }
}
