//! Waiting for fonts and images before a print surface is printed.
//!
//! Waiting never fails. Font errors count as ready, image errors count as settled
//! and the image wait as a whole is capped, so a broken asset can delay an export
//! but never block it.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use crate::config::WaitConfig;
use crate::error::HostError;

/// One `<img>` in the scope being waited on
#[async_trait(?Send)]
pub trait ImageResource {
    fn is_complete(&self) -> bool;

    fn natural_width(&self) -> u32;

    fn set_attribute(&self, name: &str, value: &str);

    /// Whether `HTMLImageElement.decode()` exists
    fn supports_decode(&self) -> bool;

    async fn decode(&self) -> Result<(), HostError>;

    /// Resolves on the next `load` or `error` event
    async fn settled(&self);
}

/// A subtree plus the document fonts it renders with
#[async_trait(?Send)]
pub trait AssetScope {
    /// `document.fonts.ready`; `Unavailable` when the font loading API is missing
    async fn fonts_ready(&self) -> Result<(), HostError>;

    /// Every `<img>` under the scope root, in document order
    fn images(&self) -> Vec<Rc<dyn ImageResource>>;
}

/// Resolve once fonts are ready and every image has loaded, failed or decoded, or
/// the image timeout has elapsed.
pub async fn wait_for_assets<S>(scope: &S, enhanced_images: bool, config: &WaitConfig)
where
    S: AssetScope + ?Sized,
{
    let fonts = async {
        if let Err(err) = scope.fonts_ready().await {
            debug!(error = %err, "font readiness unavailable, continuing");
        }
    };
    let images = wait_for_images(
        scope.images(),
        enhanced_images,
        config.image_timeout(enhanced_images),
    );
    futures::join!(fonts, images);
}

/// The capped image half of [`wait_for_assets`]
pub async fn wait_for_images(
    images: Vec<Rc<dyn ImageResource>>,
    enhanced_images: bool,
    bound: Duration,
) {
    if images.is_empty() {
        return;
    }
    if enhanced_images {
        for image in &images {
            prioritize(image.as_ref());
        }
    }

    let pending: Vec<_> = images
        .iter()
        .filter(|image| !is_loaded(image.as_ref()))
        .map(|image| image_ready(image.as_ref(), enhanced_images))
        .collect();
    if pending.is_empty() {
        return;
    }

    let count = pending.len();
    match tokio::time::timeout(bound, join_all(pending)).await {
        Ok(_) => debug!(count, "images settled"),
        Err(_) => debug!(count, bound_ms = bound.as_millis() as u64, "image wait timed out"),
    }
}

fn is_loaded(image: &dyn ImageResource) -> bool {
    image.is_complete() && image.natural_width() > 0
}

/// Ask the browser to fetch and decode eagerly
fn prioritize(image: &dyn ImageResource) {
    image.set_attribute("loading", "eager");
    image.set_attribute("decoding", "sync");
    image.set_attribute("fetchpriority", "high");
}

async fn image_ready(image: &dyn ImageResource, enhanced_images: bool) {
    if enhanced_images && image.supports_decode() {
        match image.decode().await {
            Ok(()) => return,
            Err(err) => debug!(error = %err, "image decode failed, waiting for load"),
        }
    }
    image.settled().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct TestImage {
        complete: bool,
        width: u32,
        decodes: Option<bool>,
        settles_after: Option<Duration>,
        attributes: RefCell<Vec<(String, String)>>,
        decoded: RefCell<bool>,
    }

    #[async_trait(?Send)]
    impl ImageResource for TestImage {
        fn is_complete(&self) -> bool {
            self.complete
        }

        fn natural_width(&self) -> u32 {
            self.width
        }

        fn set_attribute(&self, name: &str, value: &str) {
            self.attributes
                .borrow_mut()
                .push((name.to_string(), value.to_string()));
        }

        fn supports_decode(&self) -> bool {
            self.decodes.is_some()
        }

        async fn decode(&self) -> Result<(), HostError> {
            match self.decodes {
                Some(true) => {
                    *self.decoded.borrow_mut() = true;
                    Ok(())
                }
                _ => Err(HostError::Failed("EncodingError".to_string())),
            }
        }

        async fn settled(&self) {
            match self.settles_after {
                Some(delay) => tokio::time::sleep(delay).await,
                None => futures::future::pending::<()>().await,
            }
        }
    }

    fn assert_elapsed(start: tokio::time::Instant, millis: u64) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(millis) && elapsed <= Duration::from_millis(millis + 5),
            "elapsed {:?}, expected about {}ms",
            elapsed,
            millis
        );
    }

    struct TestScope {
        images: Vec<Rc<dyn ImageResource>>,
        fonts: Result<(), HostError>,
    }

    #[async_trait(?Send)]
    impl AssetScope for TestScope {
        async fn fonts_ready(&self) -> Result<(), HostError> {
            self.fonts.clone()
        }

        fn images(&self) -> Vec<Rc<dyn ImageResource>> {
            self.images.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_image_is_bounded() {
        let scope = TestScope {
            images: vec![Rc::new(TestImage::default())],
            fonts: Ok(()),
        };
        let start = tokio::time::Instant::now();
        wait_for_assets(&scope, false, &WaitConfig::default()).await;
        assert_elapsed(start, 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enhanced_uses_longer_bound() {
        let scope = TestScope {
            images: vec![Rc::new(TestImage::default())],
            fonts: Err(HostError::Unavailable("document.fonts".to_string())),
        };
        let start = tokio::time::Instant::now();
        wait_for_assets(&scope, true, &WaitConfig::default()).await;
        assert_elapsed(start, 8000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loaded_images_do_not_wait() {
        let image = TestImage {
            complete: true,
            width: 10,
            ..Default::default()
        };
        let start = tokio::time::Instant::now();
        wait_for_images(vec![Rc::new(image)], false, Duration::from_secs(2)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_before_bound() {
        let image = TestImage {
            complete: true,
            width: 0,
            settles_after: Some(Duration::from_millis(300)),
            ..Default::default()
        };
        let start = tokio::time::Instant::now();
        wait_for_images(vec![Rc::new(image)], false, Duration::from_secs(2)).await;
        assert_elapsed(start, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enhanced_decode_and_priority() {
        let image = Rc::new(TestImage {
            decodes: Some(true),
            ..Default::default()
        });
        let start = tokio::time::Instant::now();
        wait_for_images(vec![image.clone()], true, Duration::from_secs(8)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(*image.decoded.borrow());

        let attributes = image.attributes.borrow();
        assert!(attributes.contains(&("loading".to_string(), "eager".to_string())));
        assert!(attributes.contains(&("decoding".to_string(), "sync".to_string())));
        assert!(attributes.contains(&("fetchpriority".to_string(), "high".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_failure_falls_back_to_load() {
        let image = TestImage {
            decodes: Some(false),
            settles_after: Some(Duration::from_millis(120)),
            ..Default::default()
        };
        let start = tokio::time::Instant::now();
        wait_for_images(vec![Rc::new(image)], true, Duration::from_secs(8)).await;
        assert_elapsed(start, 120);
    }
}
