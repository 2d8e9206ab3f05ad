//! Server-rendered HTML pages.
//!
//! Deliberately plain: one shared [`layout`] and a function per page. Every
//! user-supplied string goes through [`escape`].

use std::fmt::Write as _;

use api::UserInfo;
use axum::response::Html;
use store::{Note, NoteWithOwner};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default()
}

pub fn landing() -> Html<String> {
    layout(
        "Notes Sharing",
        "<h1>Notes Sharing</h1>\n\
         <p><a href=\"/signup\">Sign up</a> | <a href=\"/login\">Log in</a> | \
         <a href=\"/view-all-notes\">Browse notes</a></p>",
    )
}

pub fn signup(error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h1>Sign up</h1>\n{}\n\
         <form method=\"post\" action=\"/signup\">\n\
         <input name=\"fullName\" placeholder=\"Full name\" required>\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required>\n\
         <input name=\"password\" type=\"password\" minlength=\"6\" required>\n\
         <input name=\"branch\" placeholder=\"Branch\" required>\n\
         <select name=\"role\"><option value=\"student\">Student</option><option value=\"teacher\">Teacher</option></select>\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n<p><a href=\"/login\">Already registered? Log in</a></p>",
        error_banner(error)
    );
    layout("Sign up", &body)
}

pub fn login(error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n{}\n\
         <form method=\"post\" action=\"/login\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required>\n\
         <input name=\"password\" type=\"password\" required>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n<p><a href=\"/signup\">Create an account</a></p>",
        error_banner(error)
    );
    layout("Log in", &body)
}

pub fn dashboard(user: &UserInfo) -> Html<String> {
    let body = format!(
        "<h1>Welcome, {}</h1>\n<p>{} &middot; {}</p>\n\
         <ul>\n\
         <li><a href=\"/upload-notes\">Upload notes</a></li>\n\
         <li><a href=\"/view-my-notes\">My notes</a></li>\n\
         <li><a href=\"/view-all-notes\">All notes</a></li>\n\
         <li><a href=\"/logout\">Log out</a></li>\n\
         </ul>",
        escape(&user.full_name),
        escape(&user.branch),
        user.role
    );
    layout("Dashboard", &body)
}

pub fn upload(error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h1>Upload Notes</h1>\n{}\n\
         <form method=\"post\" action=\"/upload-notes\" enctype=\"multipart/form-data\">\n\
         <input name=\"branch\" placeholder=\"Branch\" required>\n\
         <input name=\"subject\" placeholder=\"Subject\" required>\n\
         <textarea name=\"description\" required></textarea>\n\
         <input name=\"noteFile\" type=\"file\" accept=\".pdf,.doc,.docx,.png\" required>\n\
         <button type=\"submit\">Upload</button>\n\
         </form>",
        error_banner(error)
    );
    layout("Upload Notes", &body)
}

fn note_row(out: &mut String, note: &Note, owner: Option<&str>) {
    let _ = write!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        escape(&note.branch),
        escape(&note.subject),
        escape(&note.description),
        note.upload_date.format("%Y-%m-%d %H:%M"),
    );
    if let Some(owner) = owner {
        let _ = write!(out, "<td>{}</td>", escape(owner));
    }
    let _ = writeln!(
        out,
        "<td><a href=\"/download/{}\">Download</a></td></tr>",
        note.id
    );
}

pub fn my_notes(username: &str, notes: &[Note]) -> Html<String> {
    let mut body = format!("<h1>Notes uploaded by {}</h1>\n", escape(username));
    if notes.is_empty() {
        body.push_str("<p>You haven't uploaded any notes yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Branch</th><th>Subject</th><th>Description</th><th>Uploaded</th><th></th></tr>\n",
        );
        for note in notes {
            note_row(&mut body, note, None);
        }
        body.push_str("</table>\n");
    }
    body.push_str("<p><a href=\"/dashboard\">Back to dashboard</a></p>");
    layout("My Notes", &body)
}

pub fn all_notes(notes: &[NoteWithOwner], error: Option<&str>) -> Html<String> {
    let mut body = format!("<h1>All Notes</h1>\n{}\n", error_banner(error));
    if notes.is_empty() {
        body.push_str("<p>No notes available.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Branch</th><th>Subject</th><th>Description</th><th>Uploaded</th><th>Uploaded by</th><th></th></tr>\n",
        );
        for entry in notes {
            let owner = entry.owner_name.as_deref().unwrap_or("Unknown");
            note_row(&mut body, &entry.note, Some(owner));
        }
        body.push_str("</table>\n");
    }
    layout("All Notes", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_all_notes_error_flag() {
        let Html(page) = all_notes(&[], Some("Error fetching notes"));
        assert!(page.contains("Error fetching notes"));
        assert!(page.contains("No notes available."));
    }
}
