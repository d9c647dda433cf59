//! Image assets by logical name
//!
//! Loading is fire-and-forget. The simulation never waits on an image and the
//! renderer falls back to primitive shapes for anything not `Ready`.

/// Background music track
pub const MUSIC_TRACK: &str = "/Media/music/track.mp3";

/// Logical image names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// The falling can
    Player,
    /// Pipe image. Pipes are still drawn with the flat fill colour
    Pipe,
    /// Static page background
    Background,
    /// Box shown on the win screen
    WinBox,
}

impl ImageKey {
    pub const ALL: [ImageKey; 4] = [
        ImageKey::Player,
        ImageKey::Pipe,
        ImageKey::Background,
        ImageKey::WinBox,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ImageKey::Player => "player",
            ImageKey::Pipe => "pipe",
            ImageKey::Background => "background",
            ImageKey::WinBox => "box",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ImageKey::Player => "/Media/images/Canette_Rose.png",
            ImageKey::Pipe => "/Media/images/pipe.png",
            ImageKey::Background => "/Media/images/Background_image.png",
            ImageKey::WinBox => "/Media/images/package_2.png",
        }
    }

    fn index(self) -> usize {
        match self {
            ImageKey::Player => 0,
            ImageKey::Pipe => 1,
            ImageKey::Background => 2,
            ImageKey::WinBox => 3,
        }
    }
}

/// Load state of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Load status for every known image
#[derive(Debug, Clone, Default)]
pub struct Assets {
    status: [LoadStatus; ImageKey::ALL.len()],
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, key: ImageKey) -> LoadStatus {
        self.status[key.index()]
    }

    pub fn is_ready(&self, key: ImageKey) -> bool {
        self.status(key) == LoadStatus::Ready
    }

    pub fn mark_ready(&mut self, key: ImageKey) {
        log::info!("Loaded image '{}'", key.name());
        self.status[key.index()] = LoadStatus::Ready;
    }

    /// A failed image is final; drawing keeps using the fallback shape
    pub fn mark_failed(&mut self, key: ImageKey) {
        log::warn!(
            "Image '{}' failed to load from {} - using fallback",
            key.name(),
            key.path()
        );
        self.status[key.index()] = LoadStatus::Failed;
    }

    /// Whether the player can be drawn as a sprite instead of a circle
    pub fn player_sprite_ready(&self) -> bool {
        self.is_ready(ImageKey::Player)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    //! Browser image loading through `<img>` elements

    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlImageElement;

    use super::{Assets, ImageKey};

    /// Point `element` at the image for `key` and record the outcome.
    /// On failure the element is hidden so no broken-image icon shows.
    pub fn load_into(element: &HtmlImageElement, key: ImageKey, assets: Rc<RefCell<Assets>>) {
        {
            let assets = assets.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                assets.borrow_mut().mark_ready(key);
            });
            element.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let element_clone = element.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                assets.borrow_mut().mark_failed(key);
                let _ = element_clone.style().set_property("display", "none");
            });
            element.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        element.set_src(key.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_starts_pending() {
        let assets = Assets::new();
        for key in ImageKey::ALL {
            assert_eq!(assets.status(key), LoadStatus::Pending);
        }
        assert!(!assets.player_sprite_ready());
    }

    #[test]
    fn test_status_is_per_key() {
        let mut assets = Assets::new();
        assets.mark_ready(ImageKey::Player);
        assets.mark_failed(ImageKey::WinBox);
        assert!(assets.player_sprite_ready());
        assert!(!assets.is_ready(ImageKey::Pipe));
        assert_eq!(assets.status(ImageKey::WinBox), LoadStatus::Failed);
        assert_eq!(assets.status(ImageKey::Background), LoadStatus::Pending);
        assert_eq!(assets.status(ImageKey::Pipe), LoadStatus::Pending);

        assets.mark_ready(ImageKey::Pipe);
        assert!(assets.is_ready(ImageKey::Pipe));
        assert_eq!(assets.status(ImageKey::Player), LoadStatus::Ready);
    }

    #[test]
    fn test_keys_have_distinct_paths() {
        let mut paths: Vec<_> = ImageKey::ALL.iter().map(|k| k.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), ImageKey::ALL.len());
    }
}
