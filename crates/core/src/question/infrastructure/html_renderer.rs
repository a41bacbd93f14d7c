use crate::question::domain::category::{Category, QuestionType};
use crate::question::domain::question::GenerationResult;

const STYLE: &str = r#"
:root{--bg:#f9fafb;--card:#fff;--ring:#d0d7de;--text:#1f2937;--muted:#6b7280;--accent:#FF993B}
body{margin:0;background:var(--bg);color:var(--text);font-family:ui-sans-serif,system-ui,Segoe UI,Roboto,Arial}
.wrap{max-width:960px;margin:40px auto;padding:0 16px}
.brand{font-weight:900;font-size:22px;margin-bottom:12px}
.card{background:var(--card);border:1px solid var(--ring);border-radius:16px;padding:22px;margin-bottom:16px}
.section{border-left:4px solid var(--accent)}
h2.topic{margin:0 0 10px;font-size:20px;color:var(--accent)}
ul.qs{list-style:none;margin:0;padding:0;display:grid;gap:12px}
.q{border:1px solid var(--ring);border-radius:14px;padding:14px}
.q-head{display:flex;align-items:center;gap:10px;margin-bottom:8px}
.num{font-weight:800;font-size:14px;color:var(--muted)}
.badge{font-size:12px;padding:4px 8px;border-radius:999px;border:1px solid var(--ring)}
.q-text{line-height:1.7;font-size:17px}
"#;

/// Badge text shown next to each question number.
pub fn badge_label(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Introduce => "INTRO",
        QuestionType::Slot(slot) => slot.as_str(),
        QuestionType::Category(Category::Description) => "Description",
        QuestionType::Category(Category::Routine) => "Routine",
        QuestionType::Category(Category::Comparison) => "Comparison",
        QuestionType::Category(Category::Experience) => "Experience",
    }
}

/// Renders a generation result as a standalone preview page.
pub fn render_result_html(result: &GenerationResult) -> String {
    let mut sections = String::new();
    for set in &result.sets {
        sections.push_str(&format!(
            "<section class=\"card section\">\n<h2 class=\"topic\">TOPIC · {}</h2>\n<ul class=\"qs\">\n",
            escape_html(&set.topic)
        ));
        for q in &set.questions {
            sections.push_str(&format!(
                "<li class=\"q\"><div class=\"q-head\"><span class=\"num\">Q{}</span>\
                 <span class=\"badge\" data-type=\"{}\">{}</span></div>\
                 <div class=\"q-text\">{}</div></li>\n",
                q.number,
                q.kind.as_str(),
                badge_label(q.kind),
                escape_html(&q.text)
            ));
        }
        sections.push_str("</ul>\n</section>\n");
    }

    let title = result.mode.title();
    page(
        &format!("OPIc {title} questions"),
        &format!("<div class=\"brand\">{title} questions</div>\n<main>\n{sections}</main>"),
    )
}

/// Renders a generation failure; the message is shown verbatim.
pub fn render_error_html(message: &str) -> String {
    page(
        "Generation failed",
        &format!(
            "<div class=\"card\"><h2>Generation failed</h2><p>{}</p></div>",
            escape_html(message)
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head>\n<meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style></head>\n\
         <body><div class=\"wrap\">\n{body}\n</div></body></html>\n",
        escape_html(title)
    )
}

fn escape_html(text: &str) -> String {
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
