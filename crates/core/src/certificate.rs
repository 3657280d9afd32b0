//! Signed-PDF certificate generator.
//!
//! Takes the original contract PDF plus the signatory list and produces a new
//! document: each signed party's signature image and name/date caption are
//! overlaid on the final page of the source document, and exactly one
//! "certificate of authenticity" page is appended listing the document
//! fingerprint, a fresh verification code, per-signatory metadata, and a
//! fixed legal-basis text block.
//!
//! The fingerprint is a truncated SHA-256 digest of the *original unmodified
//! bytes*, computed before any mutation. It is a readability feature for
//! cross-referencing records, not a third-party-verifiable seal.
//!
//! Partial-embedding policy: a signatory whose signature image is missing or
//! undecodable never fails generation; that signatory's overlay block is
//! omitted and they are still listed on the certificate page.

use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::hashing::document_fingerprint;
use crate::token::verification_code;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// Contract fields rendered onto the certificate page.
#[derive(Debug, Clone)]
pub struct ContractSummary {
    pub title: String,
    /// Stable reference printed on the certificate, e.g. `CS-000042`.
    pub reference: String,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
}

/// One signatory, with the signature image bytes already fetched (or absent).
#[derive(Debug, Clone)]
pub struct SignerInfo {
    pub name: String,
    pub email: String,
    pub signed: bool,
    pub signed_at: Option<Timestamp>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Raw PNG/JPEG bytes of the captured signature, if available.
    pub signature_image: Option<Vec<u8>>,
}

/// Result of a certificate render.
#[derive(Debug)]
pub struct GeneratedCertificate {
    /// The full output document: source pages (with overlays) + one
    /// certificate page.
    pub pdf: Vec<u8>,
    pub verification_code: String,
    pub fingerprint: String,
    /// Names of signed signatories whose image bytes could not be embedded.
    pub skipped_images: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("source document is empty")]
    EmptySource,

    #[error("source document has no pages")]
    NoPages,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

// ---------------------------------------------------------------------------
// Layout constants (points; US Letter certificate page)
// ---------------------------------------------------------------------------

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: f32 = 54.0;

/// Signature overlay slot geometry on the final source page.
const SLOT_WIDTH: f32 = 170.0;
const SLOT_HEIGHT: f32 = 64.0;
const SLOT_BASE_Y: f32 = 36.0;
const SLOTS_PER_ROW: usize = 3;
const SIG_IMAGE_WIDTH: f32 = 130.0;
const SIG_IMAGE_HEIGHT: f32 = 40.0;

/// Fixed legal-basis text printed at the foot of the certificate page.
const LEGAL_TEXT: &[&str] = &[
    "This certificate records the electronic signature events applied to the",
    "referenced document. Each signatory affirmatively adopted the document by",
    "applying an electronic signature, within the meaning of applicable",
    "electronic-transaction statutes (including the U.S. ESIGN Act and UETA,",
    "and eIDAS for EU parties). The document fingerprint above was computed",
    "from the source document at the time of certificate generation and may be",
    "used to cross-reference stored records.",
];

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Render the signed document: overlays on the last source page plus one
/// appended certificate page.
///
/// Never fails on a bad signature image; see the module docs for the
/// partial-embedding policy.
pub fn generate(
    source_pdf: &[u8],
    contract: &ContractSummary,
    signers: &[SignerInfo],
) -> Result<GeneratedCertificate, CertificateError> {
    if source_pdf.is_empty() {
        return Err(CertificateError::EmptySource);
    }

    // Fingerprint the untouched source bytes before any mutation.
    let fingerprint = document_fingerprint(source_pdf);
    let code = verification_code();

    let mut doc = Document::load_mem(source_pdf)?;
    let pages = doc.get_pages();
    let &last_page_id = pages.values().next_back().ok_or(CertificateError::NoPages)?;

    let mut skipped = Vec::new();
    overlay_signatures(&mut doc, last_page_id, signers, &mut skipped)?;
    append_certificate_page(&mut doc, contract, signers, &fingerprint, &code)?;

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(lopdf::Error::from)?;

    Ok(GeneratedCertificate {
        pdf: out,
        verification_code: code,
        fingerprint,
        skipped_images: skipped,
    })
}

// ---------------------------------------------------------------------------
// Signature overlays
// ---------------------------------------------------------------------------

/// Draw each signed signatory's image + caption in a slot grid along the
/// bottom of the last page. Signatories without a decodable image are
/// recorded in `skipped` and get no overlay block.
fn overlay_signatures(
    doc: &mut Document,
    page_id: ObjectId,
    signers: &[SignerInfo],
    skipped: &mut Vec<String>,
) -> Result<(), CertificateError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    add_page_resource(doc, page_id, "Font", "CsHelv", font_id)?;

    let mut ops: Vec<Operation> = Vec::new();
    let mut slot = 0usize;

    for signer in signers.iter().filter(|s| s.signed) {
        let Some(bytes) = signer.signature_image.as_deref() else {
            skipped.push(signer.name.clone());
            continue;
        };
        let Some((image_id, _, _)) = embed_signature_image(doc, bytes) else {
            skipped.push(signer.name.clone());
            continue;
        };

        let name = format!("CsSig{slot}");
        add_page_resource(doc, page_id, "XObject", &name, image_id)?;

        let x = MARGIN + (slot % SLOTS_PER_ROW) as f32 * SLOT_WIDTH;
        let y = SLOT_BASE_Y + (slot / SLOTS_PER_ROW) as f32 * SLOT_HEIGHT;

        // Image placement: scale the unit square to the slot box.
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                SIG_IMAGE_WIDTH.into(),
                0f32.into(),
                0f32.into(),
                SIG_IMAGE_HEIGHT.into(),
                x.into(),
                (y + 14.0).into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));

        // Caption: name on one line, signing date under it.
        let when = signer
            .signed_at
            .map(format_timestamp)
            .unwrap_or_else(|| "date not recorded".to_string());
        ops.extend(text_ops("CsHelv", 7.0, x, y + 8.0, &signer.name));
        ops.extend(text_ops("CsHelv", 7.0, x, y, &format!("Signed {when}")));

        slot += 1;
    }

    if ops.is_empty() {
        return Ok(());
    }

    let content = Content { operations: ops };
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
    append_page_content(doc, page_id, stream_id)
}

/// Build an image XObject from raw PNG/JPEG/WebP bytes.
///
/// JPEG passes through with `DCTDecode`; everything else is decoded and
/// flattened onto white (signature PNGs are typically ink-on-transparent) and
/// embedded as raw 8-bit RGB. Returns `None` when the bytes don't decode.
fn embed_signature_image(doc: &mut Document, bytes: &[u8]) -> Option<(ObjectId, u32, u32)> {
    let format = image::guess_format(bytes).ok()?;
    let decoded = image::load_from_memory(bytes).ok()?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return None;
    }

    let id = if format == ImageFormat::Jpeg {
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            bytes.to_vec(),
        ))
    } else {
        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for px in rgba.pixels() {
            let [r, g, b, a] = px.0;
            let a = a as u32;
            // Alpha-blend over white so transparent backgrounds print clean.
            rgb.push(((r as u32 * a + 255 * (255 - a)) / 255) as u8);
            rgb.push(((g as u32 * a + 255 * (255 - a)) / 255) as u8);
            rgb.push(((b as u32 * a + 255 * (255 - a)) / 255) as u8);
        }
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb,
        ))
    };

    Some((id, width, height))
}

// ---------------------------------------------------------------------------
// Certificate page
// ---------------------------------------------------------------------------

fn append_certificate_page(
    doc: &mut Document,
    contract: &ContractSummary,
    signers: &[SignerInfo],
    fingerprint: &str,
    code: &str,
) -> Result<(), CertificateError> {
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    };

    let mut ops: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT as f32 - 72.0;

    ops.extend(text_ops("F2", 18.0, MARGIN, y, "Certificate of Authenticity"));
    y -= 28.0;
    ops.extend(rule_ops(MARGIN, y, PAGE_WIDTH as f32 - MARGIN));
    y -= 22.0;

    // Document block.
    ops.extend(text_ops("F2", 10.0, MARGIN, y, "Document"));
    y -= 14.0;
    ops.extend(text_ops("F1", 10.0, MARGIN, y, &contract.title));
    y -= 13.0;
    ops.extend(text_ops(
        "F1",
        9.0,
        MARGIN,
        y,
        &format!("Reference: {}", contract.reference),
    ));
    y -= 12.0;
    ops.extend(text_ops(
        "F1",
        9.0,
        MARGIN,
        y,
        &format!("Created: {}", format_timestamp(contract.created_at)),
    ));
    y -= 12.0;
    if let Some(sent_at) = contract.sent_at {
        ops.extend(text_ops(
            "F1",
            9.0,
            MARGIN,
            y,
            &format!("Sent for signature: {}", format_timestamp(sent_at)),
        ));
        y -= 12.0;
    }
    if let Some(signed_at) = contract.signed_at {
        ops.extend(text_ops(
            "F1",
            9.0,
            MARGIN,
            y,
            &format!("Completed: {}", format_timestamp(signed_at)),
        ));
        y -= 12.0;
    }
    y -= 8.0;

    // Fingerprint + verification code.
    ops.extend(text_ops(
        "F2",
        10.0,
        MARGIN,
        y,
        &format!("Document fingerprint (SHA-256, truncated): {fingerprint}"),
    ));
    y -= 14.0;
    ops.extend(text_ops(
        "F2",
        10.0,
        MARGIN,
        y,
        &format!("Verification code: {code}"),
    ));
    y -= 22.0;
    ops.extend(rule_ops(MARGIN, y, PAGE_WIDTH as f32 - MARGIN));
    y -= 20.0;

    // Per-signatory audit blocks.
    ops.extend(text_ops("F2", 10.0, MARGIN, y, "Signatories"));
    y -= 16.0;
    for signer in signers {
        let status = if signer.signed {
            match signer.signed_at {
                Some(at) => format!("signed {}", format_timestamp(at)),
                None => "signed".to_string(),
            }
        } else {
            "not signed".to_string()
        };
        ops.extend(text_ops(
            "F2",
            9.0,
            MARGIN,
            y,
            &format!("{} <{}> - {}", signer.name, signer.email, status),
        ));
        y -= 11.0;

        let ip = signer.ip_address.as_deref().unwrap_or("n/a");
        let browser = signer.user_agent.as_deref().unwrap_or("n/a");
        ops.extend(text_ops(
            "F1",
            8.0,
            MARGIN + 12.0,
            y,
            &format!("IP: {ip}   Browser: {browser}"),
        ));
        y -= 16.0;
    }

    y -= 6.0;
    ops.extend(rule_ops(MARGIN, y, PAGE_WIDTH as f32 - MARGIN));
    y -= 18.0;

    for line in LEGAL_TEXT {
        ops.extend(text_ops("F1", 8.0, MARGIN, y, line));
        y -= 10.0;
    }

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Resources" => resources,
        "Contents" => content_id,
    });

    let pages = doc
        .get_object_mut(pages_id)?
        .as_dict_mut()?;
    pages.get_mut(b"Kids")?.as_array_mut()?.push(page_id.into());
    let count = pages.get(b"Count")?.as_i64()?;
    pages.set("Count", count + 1);

    Ok(())
}

// ---------------------------------------------------------------------------
// PDF plumbing helpers
// ---------------------------------------------------------------------------

/// Append a content stream to a page, preserving any existing content.
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<(), CertificateError> {
    let current = doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
    let new_contents = match current {
        Some(Object::Reference(existing)) => {
            Object::Array(vec![existing.into(), stream_id.into()])
        }
        Some(Object::Array(mut items)) => {
            items.push(stream_id.into());
            Object::Array(items)
        }
        _ => stream_id.into(),
    };
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", new_contents);
    Ok(())
}

/// Register `obj` under `/Resources/<category>/<name>` on a page.
///
/// Pages may inherit or share Resources via references; shared dictionaries
/// are copied inline onto the page before mutation so sibling pages are left
/// untouched.
fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    obj: ObjectId,
) -> Result<(), CertificateError> {
    // Inline the Resources dictionary if it is missing or referenced.
    let resources = match doc.get_dictionary(page_id)?.get(b"Resources") {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(rid)) => doc.get_dictionary(*rid)?.clone(),
        _ => Dictionary::new(),
    };
    let mut resources = resources;

    // Same copy-on-write treatment for the category sub-dictionary.
    let mut sub = match resources.get(category.as_bytes()) {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(rid)) => doc.get_dictionary(*rid)?.clone(),
        _ => Dictionary::new(),
    };
    sub.set(name, obj);
    resources.set(category, sub);

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", resources);
    Ok(())
}

/// `BT /font size Tf x y Td (text) Tj ET` with the text sanitized to the
/// printable ASCII range the base-14 fonts cover.
fn text_ops(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font.into()), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(sanitize(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Thin horizontal rule from `x1` to `x2` at height `y`.
fn rule_ops(x1: f32, y: f32, x2: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("w", vec![0.5f32.into()]),
        Operation::new("RG", vec![0.6f32.into(), 0.6f32.into(), 0.6f32.into()]),
        Operation::new("m", vec![x1.into(), y.into()]),
        Operation::new("l", vec![x2.into(), y.into()]),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// Replace characters outside printable ASCII; base-14 font encoding only.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

fn format_timestamp(at: Timestamp) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
