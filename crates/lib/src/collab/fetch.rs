//! Blocking HTTP downloads.
//!
//! Google Drive answers downloads of large files with an HTML page asking
//! to confirm that the file could not be virus-scanned. When a Drive URL
//! yields such a page, the download is retried through the page's
//! `download-form` (its `action` plus every hidden input), or, on older
//! pages, by adding the `confirm` token from the download link.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{CollaboratorError, Fetcher};

const DRIVE_HOST: &str = "drive.google.com";

/// Downloads files over HTTP(S) with a shared blocking client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, CollaboratorError> {
    let client = Client::builder()
      .user_agent(concat!("depstrap/", env!("CARGO_PKG_VERSION")))
      .cookie_store(true)
      .build()
      .map_err(|e| CollaboratorError::Download {
        url: String::new(),
        message: format!("failed to build HTTP client: {e}"),
      })?;
    Ok(Self { client })
  }

  fn get(&self, url: &str) -> Result<Response, CollaboratorError> {
    let response = self.client.get(url).send().map_err(|e| download_error(url, e))?;

    if !response.status().is_success() {
      return Err(CollaboratorError::Download {
        url: url.to_string(),
        message: format!("HTTP {}", response.status()),
      });
    }

    Ok(response)
  }

  /// Resolve the Drive virus-scan interstitial, if that is what we got.
  fn confirm_drive_download(&self, url: &str, response: Response) -> Result<Response, CollaboratorError> {
    if !is_html(&response) {
      return Ok(response);
    }

    let body = response.text().map_err(|e| download_error(url, e))?;
    let Some(confirmed) = drive_confirmation_url(url, &body) else {
      return Err(CollaboratorError::Download {
        url: url.to_string(),
        message: "Google Drive returned a web page instead of the file; check that it is shared publicly".to_string(),
      });
    };

    debug!(url = %confirmed, "confirming Google Drive download");
    let response = self.get(confirmed.as_str())?;

    if is_html(&response) {
      return Err(CollaboratorError::Download {
        url: url.to_string(),
        message: "Google Drive did not serve the file after confirmation".to_string(),
      });
    }
    Ok(response)
  }
}

impl Fetcher for HttpFetcher {
  fn download(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError> {
    debug!(url, dest = %dest.display(), "downloading");

    let mut response = self.get(url)?;
    if is_drive_url(url) {
      response = self.confirm_drive_download(url, response)?;
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|e| CollaboratorError::io(parent, e))?;
    }

    let file = File::create(dest).map_err(|e| CollaboratorError::io(dest, e))?;
    let mut writer = BufWriter::new(file);
    let size = response.copy_to(&mut writer).map_err(|e| download_error(url, e))?;
    writer
      .into_inner()
      .map_err(|e| CollaboratorError::io(dest, e.into_error()))?;

    debug!(path = %dest.display(), size, "download complete");
    Ok(())
  }
}

fn download_error(url: &str, e: reqwest::Error) -> CollaboratorError {
  CollaboratorError::Download {
    url: url.to_string(),
    message: e.to_string(),
  }
}

fn is_html(response: &Response) -> bool {
  response
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("text/html"))
}

fn is_drive_url(url: &str) -> bool {
  url
    .split("://")
    .nth(1)
    .and_then(|rest| rest.split(['/', '?']).next())
    .is_some_and(|host| host.eq_ignore_ascii_case(DRIVE_HOST))
}

/// Where to fetch the file from after Drive served its confirmation page.
fn drive_confirmation_url(url: &str, body: &str) -> Option<Url> {
  if let Some(form) = download_form_url(body) {
    return Some(form);
  }

  let token = drive_confirm_token(body)?;
  let mut confirmed = Url::parse(url).ok()?;
  confirmed.query_pairs_mut().append_pair("confirm", token);
  Some(confirmed)
}

/// The `download-form` target: its `action` with each hidden input as a
/// query parameter.
fn download_form_url(body: &str) -> Option<Url> {
  let marker = body.find(r#"id="download-form""#)?;
  let form = &body[body[..marker].rfind("<form")?..];
  let form = &form[..form.find("</form>").unwrap_or(form.len())];

  let action = attribute(&form[..form.find('>')?], "action")?;
  let mut url = Url::parse(&unescape(action)).ok()?;
  {
    let mut query = url.query_pairs_mut();
    for input in form.split("<input").skip(1) {
      let tag = &input[..input.find('>').unwrap_or(input.len())];
      if attribute(tag, "type") != Some("hidden") {
        continue;
      }
      if let Some(name) = attribute(tag, "name") {
        query.append_pair(&unescape(name), &unescape(attribute(tag, "value").unwrap_or_default()));
      }
    }
  }
  if url.query() == Some("") {
    url.set_query(None);
  }
  Some(url)
}

/// Value of a double-quoted attribute inside a single HTML tag.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
  let needle = format!("{name}=\"");
  let mut from = 0;
  while let Some(pos) = tag[from..].find(&needle) {
    let start = from + pos;
    if tag[..start].ends_with(char::is_whitespace) {
      let value = &tag[start + needle.len()..];
      return value.find('"').map(|end| &value[..end]);
    }
    from = start + needle.len();
  }
  None
}

fn unescape(value: &str) -> String {
  value.replace("&amp;", "&")
}

/// Extract the `confirm=<token>` value from an older Drive interstitial.
fn drive_confirm_token(body: &str) -> Option<&str> {
  let start = body.find("confirm=")? + "confirm=".len();
  let rest = &body[start..];
  let end = rest
    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    .unwrap_or(rest.len());
  let token = &rest[..end];
  (!token.is_empty()).then_some(token)
}
