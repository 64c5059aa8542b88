/// Discord rejects messages over 2000 characters; stay under with some margin.
const CHUNK_MAX: usize = 1950;

/// Split `text` into pieces of at most [`CHUNK_MAX`] bytes, breaking on the
/// last newline or space inside the window when one exists so words survive
/// intact. Falls back to a hard cut on a char boundary for unbroken runs.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.len() > CHUNK_MAX {
        let mut window_end = CHUNK_MAX;
        while !rest.is_char_boundary(window_end) {
            window_end -= 1;
        }
        let window = &rest[..window_end];

        let cut = match window.rfind('\n').or_else(|| window.rfind(' ')) {
            Some(0) | None => window_end,
            Some(pos) => pos,
        };

        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

/// Send `text` to `channel_id`, chunked to fit Discord's message length limit.
pub async fn send_chunked(
    http: &serenity::http::Http,
    channel_id: serenity::model::id::ChannelId,
    text: &str,
) -> Result<(), serenity::Error> {
    for chunk in split_chunks(text) {
        channel_id.say(http, chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through_whole() {
        assert_eq!(split_chunks("hey"), vec!["hey".to_string()]);
    }

    #[test]
    fn splits_prefer_newlines() {
        let paragraph = "b".repeat(1200);
        let text = format!("{paragraph}\n{paragraph}");
        let chunks = split_chunks(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], paragraph);
        assert_eq!(chunks[1], paragraph);
    }

    #[test]
    fn unbroken_run_is_hard_cut() {
        let text = "y".repeat(CHUNK_MAX * 2 + 10);
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.len() <= CHUNK_MAX));
        let total: usize = chunks.iter().map(String::len).sum();
        assert_eq!(total, text.len());
    }

    #[test]
    fn multibyte_text_never_splits_inside_a_char() {
        let text = "ő".repeat(CHUNK_MAX); // 2 bytes each
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX);
            assert!(c.chars().all(|ch| ch == 'ő'));
        }
    }
}
