//! Fixtures shared by unit tests

use lopdf::{dictionary, Dictionary, Document, Object};
use std::path::Path;

/// Write a minimal one-catalog PDF with `extra` appended as indirect objects
pub(crate) fn write_pdf(path: &Path, extra: Vec<Dictionary>) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => Object::Integer(0),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    for dict in extra {
        doc.add_object(dict);
    }
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// A signature dictionary as produced by common signing tools
pub(crate) fn signature(name: Option<&str>) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "Sig",
        "Filter" => "Adobe.PPKLite",
        "SubFilter" => "adbe.pkcs7.detached",
    };
    if let Some(name) = name {
        dict.set("Name", Object::string_literal(name));
    }
    dict
}
