//! Test fixtures for creating documents on disk.
//!
//! Template fixtures are real AcroForm PDFs built in memory with lopdf, so the
//! generator fills them exactly as it would a production template.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use lopdf::{dictionary, Document, Object, Stream};

use server_core::domains::advisory::models::TemplateCatalog;

/// Field names taken from production agreement templates, plus one no rule claims.
pub const TEMPLATE_FIELDS: &[&str] = &[
    "Investment Advisor Representative Name",
    "Rep Code",
    "Client Name Printed",
    "Text3",
    "Signature1",
];

/// A one-page PDF whose AcroForm holds one text field per name.
pub fn acroform_pdf(field_names: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let mut field_ids = Vec::new();
    for (i, name) in field_names.iter().enumerate() {
        let y = 700 - 30 * i as i64;
        let id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(*name),
            "Rect" => vec![
                Object::Integer(72),
                Object::Integer(y),
                Object::Integer(360),
                Object::Integer(y + 20),
            ],
            "P" => page_id,
        });
        field_ids.push(id);
    }
    let field_refs: Vec<Object> = field_ids.iter().map(|id| Object::Reference(*id)).collect();

    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => content_id,
            "Annots" => field_refs.clone(),
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let form_id = doc.add_object(dictionary! {
        "Fields" => field_refs,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => form_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture PDF");
    bytes
}

/// Write the fixture template under every archetype filename.
pub fn write_templates(catalog: &TemplateCatalog) {
    std::fs::create_dir_all(catalog.folder()).expect("Failed to create templates folder");
    let bytes = acroform_pdf(TEMPLATE_FIELDS);
    for template in catalog.templates() {
        std::fs::write(catalog.path_for(template), &bytes).expect("Failed to write template");
    }
}

/// Write a small PDF-looking file into `folder`.
pub fn write_pdf(folder: &Path, filename: &str) -> PathBuf {
    std::fs::create_dir_all(folder).expect("Failed to create folder");
    let path = folder.join(filename);
    std::fs::write(&path, format!("%PDF-1.4\n% {}\n%%EOF\n", filename)).expect("Failed to write PDF");
    path
}

/// Set a file's modification time to `seconds_ago` before now.
pub fn set_modified_ago(path: &Path, seconds_ago: u64) {
    let when = SystemTime::now() - Duration::from_secs(seconds_ago);
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(when))
        .expect("Failed to set modification time");
}
