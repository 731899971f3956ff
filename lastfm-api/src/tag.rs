//! Tag API. All methods are public reads.

use crate::client::LastfmClient;
use crate::error::Result;
use crate::params::ParamMap;
use crate::transport::Transport;
use crate::types::Page;
use serde_json::Value;

impl<T: Transport> LastfmClient<T> {
    /// Get the metadata for a tag, including the wiki text in `lang`.
    pub fn tag_info(&self, tag: &str, lang: Option<&str>) -> Result<Value> {
        let params = ParamMap::new().with("tag", tag).with("lang", lang);
        self.unsigned_call("tag.getInfo", params)
    }

    /// Tags similar to this one, ranked by similarity.
    pub fn tag_similar(&self, tag: &str) -> Result<Value> {
        self.unsigned_call("tag.getSimilar", ParamMap::new().with("tag", tag))
    }

    /// Top albums tagged with `tag`, ordered by tag count.
    pub fn tag_top_albums(&self, tag: &str, page: Page) -> Result<Value> {
        self.tag_chart("tag.getTopAlbums", tag, page)
    }

    /// Top artists tagged with `tag`, ordered by tag count.
    pub fn tag_top_artists(&self, tag: &str, page: Page) -> Result<Value> {
        self.tag_chart("tag.getTopArtists", tag, page)
    }

    /// Top global tags, sorted by number of times used.
    pub fn tag_top_tags(&self) -> Result<Value> {
        self.unsigned_call("tag.getTopTags", ParamMap::new())
    }

    /// Top tracks tagged with `tag`, ordered by tag count.
    pub fn tag_top_tracks(&self, tag: &str, page: Page) -> Result<Value> {
        self.tag_chart("tag.getTopTracks", tag, page)
    }

    /// Date ranges of the weekly charts available for `tag`.
    pub fn tag_weekly_chart_list(&self, tag: &str) -> Result<Value> {
        self.unsigned_call("tag.getWeeklyChartList", ParamMap::new().with("tag", tag))
    }

    fn tag_chart(&self, method: &str, tag: &str, page: Page) -> Result<Value> {
        let mut params = ParamMap::new().with("tag", tag);
        page.apply(&mut params);
        self.unsigned_call(method, params)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::LastfmClient;
    use crate::config::ApiConfig;
    use crate::transport::HttpVerb;
    use crate::transport::testing::FakeTransport;
    use crate::types::Page;

    fn client() -> LastfmClient<FakeTransport> {
        LastfmClient::with_transport(ApiConfig::new("key", "secret"), FakeTransport::ok())
    }

    #[test]
    fn top_tags_has_no_extra_fields() {
        let client = client();
        client.tag_top_tags().unwrap();
        let req = client.transport().last();
        assert_eq!(req.verb, HttpVerb::Get);
        let names: Vec<_> = req.params.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["api_key", "format", "method"]);
    }

    #[test]
    fn charts_send_tag_and_paging() {
        let client = client();
        client.tag_top_tracks("disco", Page::new(25, 3)).unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["method"], "tag.getTopTracks");
        assert_eq!(req.params["tag"], "disco");
        assert_eq!(req.params["limit"], "25");
        assert_eq!(req.params["page"], "3");
    }

    #[test]
    fn info_omits_unset_lang() {
        let client = client();
        client.tag_info("disco", None).unwrap();
        assert!(!client.transport().last().params.contains_key("lang"));
    }
}
