//! Presentation states derived from store state
//!
//! Pure functions only; the screen models decide when to re-run them.

use crate::types::Asset;

/// What the asset list screen should show
#[derive(Debug, Clone, PartialEq)]
pub enum ListUiState {
    Loading,
    Error(String),
    /// Last known list; `None` if nothing has been fetched yet
    Content(Option<Vec<Asset>>),
}

/// What the asset detail screen should show
#[derive(Debug, Clone, PartialEq)]
pub struct DetailUiState {
    pub detail: Asset,
    /// True while a detail fetch is in flight; `detail` may be stale
    pub is_refreshing: bool,
}

/// Loading wins over error, error wins over content
pub fn project_list(
    is_loading: bool,
    assets: Option<&[Asset]>,
    error_message: Option<&str>,
) -> ListUiState {
    if is_loading {
        return ListUiState::Loading;
    }
    match error_message {
        Some(message) => ListUiState::Error(message.to_string()),
        None => ListUiState::Content(assets.map(<[Asset]>::to_vec)),
    }
}

/// `None` until a detail has been resolved
pub fn project_detail(is_loading: bool, detail: Option<Asset>) -> Option<DetailUiState> {
    detail.map(|detail| DetailUiState {
        detail,
        is_refreshing: is_loading,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::bitcoin;

    #[test]
    fn test_project_list_precedence() {
        let assets = vec![bitcoin()];

        assert_eq!(
            project_list(true, Some(assets.as_slice()), Some("boom")),
            ListUiState::Loading
        );
        assert_eq!(
            project_list(false, Some(assets.as_slice()), Some("boom")),
            ListUiState::Error("boom".to_string())
        );
        assert_eq!(
            project_list(false, Some(assets.as_slice()), None),
            ListUiState::Content(Some(assets.clone()))
        );
        assert_eq!(project_list(false, None, None), ListUiState::Content(None));
        assert_eq!(
            project_list(false, Some(&[][..]), None),
            ListUiState::Content(Some(Vec::new()))
        );
    }

    #[test]
    fn test_project_detail() {
        assert_eq!(project_detail(true, None), None);
        assert_eq!(
            project_detail(true, Some(bitcoin())),
            Some(DetailUiState {
                detail: bitcoin(),
                is_refreshing: true
            })
        );
        assert_eq!(
            project_detail(false, Some(bitcoin())).map(|s| s.is_refreshing),
            Some(false)
        );
    }
}
