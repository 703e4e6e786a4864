//! HTML markup for faces, sheets and the deck document.

use std::fmt::Write;

use super::{FaceRef, Sheet, Side};
use crate::data::Card;
use crate::device::DeviceClass;

/// Heading of the native-language face.
const NATIVE_SECTION: &str = "日本語で名前の意味";

/// Heading of the English face.
const ENGLISH_SECTION: &str = "Name Origin";

/// Escapes text for use in HTML content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_face(card: &Card, side: Side) -> String {
    let category = escape_html(&card.category);
    let english = escape_html(&card.english);
    let published = escape_html(&card.published);
    let kana = escape_html(&card.kana);

    let icon = card.category_icon.as_deref().map_or_else(String::new, |src| {
        format!("<img src='{}' alt='{category}'/>", escape_html(src))
    });
    let (spoken, alt, section) = match side {
        Side::Native => (&kana, &kana, NATIVE_SECTION),
        Side::English => (&published, &english, ENGLISH_SECTION),
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<div class='card' data-card-id='{id}' data-side='{side}' data-tcg-type='{category}'>\
         <div class='card-header'><div class='type-icon'>{icon}</div></div>\
         <div class='card-title'><span class='english-name'>{english}</span>\
         <span class='japanese-name'>{published} ({kana})\
         <button class='speak-btn' data-speak='{spoken}' data-lang='ja-JP' title='Speak'>🔊</button>\
         </span></div>\
         <div class='line'></div>\
         <div class='image-box'><div class='frame'><img src='{image}' alt='{alt}'/></div></div>\
         <div class='section'>{section}</div><div class='content'>",
        id = card.id,
        side = match side {
            Side::Native => "native",
            Side::English => "english",
        },
        image = escape_html(&card.image),
    );

    match side {
        Side::Native => {
            for element in &card.origin_elements {
                let _ = write!(html, "<p>・{}</p>", escape_html(element));
            }
        }
        Side::English => {
            let _ = write!(
                html,
                "<p style='margin-top:6px'>{}</p>\
                 <p style='margin-top:6px'><strong>English:</strong> {english}</p>",
                escape_html(&card.description)
            );
        }
    }
    html.push_str("</div></div>");
    html
}

fn render_faces(cards: &[Card], faces: &[FaceRef]) -> String {
    faces
        .iter()
        .filter_map(|face| cards.get(face.card).map(|card| render_face(card, face.side)))
        .collect()
}

/// Renders the sheet container contents.
///
/// On large layouts every sheet except `visible` carries the `hidden`
/// class. Small layouts wrap all sheets in a single scroll container and
/// hide nothing.
#[must_use]
pub fn render_sheets(
    cards: &[Card],
    sheets: &[Sheet],
    class: DeviceClass,
    visible: usize,
) -> String {
    let mut html = String::new();
    match class {
        DeviceClass::Small => {
            html.push_str("<div class='mobile-scroll-container'>");
            for sheet in sheets {
                let _ = write!(
                    html,
                    "<section class='sheet card-face' data-sheet='{}'>{}</section>",
                    sheet.index,
                    render_faces(cards, &sheet.faces)
                );
            }
            html.push_str("</div>");
        }
        DeviceClass::Large => {
            for sheet in sheets {
                let hidden = if sheet.index == visible { "" } else { " hidden" };
                let _ = write!(
                    html,
                    "<section class='sheet{hidden}' data-sheet='{}'>{}</section>",
                    sheet.index,
                    render_faces(cards, &sheet.faces)
                );
            }
        }
    }
    html
}

/// Wraps sheet and pager markup in a complete HTML document.
#[must_use]
pub fn render_document(title: &str, class: DeviceClass, sheets_html: &str, pager_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang='ja'>\n<head>\n<meta charset='utf-8'/>\n\
         <meta name='viewport' content='width=device-width, initial-scale=1'/>\n\
         <title>{title}</title>\n<link rel='stylesheet' href='style.css'/>\n</head>\n\
         <body data-device='{class}'>\n<div id='sheets'>{sheets_html}</div>\n\
         <nav id='pager'>{pager_html}</nav>\n{DECK_SCRIPT}</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// The page shown when any deck source fails to load.
#[must_use]
pub fn render_error_page() -> String {
    "<!DOCTYPE html>\n<html lang='en'>\n<head><meta charset='utf-8'/><title>Error</title></head>\n\
     <body><h1>Error loading data</h1>\
     <p>Please make sure the JSON files are available.</p></body>\n</html>\n"
        .to_string()
}

/// Posts speak-button clicks to `/speak` and reloads on pager clicks.
const DECK_SCRIPT: &str = "<script>\
document.addEventListener('click',function(e){\
var b=e.target.closest('.speak-btn');\
if(b){fetch('speak',{method:'POST',headers:{'Content-Type':'application/json'},\
body:JSON.stringify({text:b.dataset.speak,lang:b.dataset.lang})});return;}\
var p=e.target.closest('#pager button');\
if(p&&!p.disabled){location.search='?device='+document.body.dataset.device+'&page='+p.dataset.page;}});\
</script>\n";
