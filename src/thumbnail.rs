use eframe::egui::ColorImage;

/// Downloads and decodes the thumbnail image the backend reported for a video.
pub fn fetch_thumbnail(url: &str) -> Option<ColorImage> {
    // Blocking GET; any transport or status failure means no thumbnail
    let resp = match reqwest::blocking::get(url).and_then(|r| r.error_for_status()) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(%url, error = %e, "thumbnail fetch failed");
            return None;
        }
    };
    let bytes = resp.bytes().ok()?;
    // Decode whatever format the CDN served (jpg/webp/png) into RGBA8
    let img = image::load_from_memory(&bytes).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, &img))
}
