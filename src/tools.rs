//! Tool registry - the fixed set of conversion tools and their metadata.

/// Conversion variant, closed set selected by URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
  MergePdf,
  PngToPdf,
  Mp4ToMp3,
}

/// Display and upload metadata for one tool
pub struct ToolDescriptor {
  pub kind: ToolKind,
  pub slug: &'static str,
  pub title: &'static str,
  pub description: &'static str,
  /// Accepted file extension for the upload form
  pub accept: &'static str,
  /// Whether the form accepts more than one file
  pub multiple: bool,
}

/// All registered tools
pub const TOOLS: [ToolDescriptor; 3] = [
  ToolDescriptor {
    kind: ToolKind::MergePdf,
    slug: "merge-pdf",
    title: "Merge PDF",
    description: "Combine several PDF documents into one, in upload order.",
    accept: ".pdf",
    multiple: true,
  },
  ToolDescriptor {
    kind: ToolKind::PngToPdf,
    slug: "png-to-pdf",
    title: "PNG → PDF",
    description: "Turn one or more PNG images into a single PDF, one page per image.",
    accept: ".png",
    multiple: true,
  },
  ToolDescriptor {
    kind: ToolKind::Mp4ToMp3,
    slug: "mp4-to-mp3",
    title: "MP4 → MP3",
    description: "Extract the audio track of an MP4 video as an MP3 file.",
    accept: ".mp4",
    multiple: false,
  },
];

/// Look up a tool by slug; `None` maps to HTTP 404 in the routing layer.
pub fn lookup(slug: &str) -> Option<&'static ToolDescriptor> {
  TOOLS.iter().find(|t| t.slug == slug)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_finds_every_registered_slug() {
    for tool in &TOOLS {
      let found = lookup(tool.slug).expect("registered slug must resolve");
      assert_eq!(found.kind, tool.kind);
    }
  }

  #[test]
  fn lookup_rejects_unknown_slug() {
    assert!(lookup("does-not-exist").is_none());
    assert!(lookup("").is_none());
    assert!(lookup("MERGE-PDF").is_none());
  }

  #[test]
  fn slugs_are_unique() {
    for (i, a) in TOOLS.iter().enumerate() {
      for b in &TOOLS[i + 1..] {
        assert_ne!(a.slug, b.slug);
      }
    }
  }

  #[test]
  fn only_mp4_tool_is_single_file() {
    assert!(!lookup("mp4-to-mp3").unwrap().multiple);
    assert!(lookup("merge-pdf").unwrap().multiple);
    assert!(lookup("png-to-pdf").unwrap().multiple);
  }
}
