use chrono::{TimeZone, Utc};
use rs_placereviews::extractor::{extract_card, fields, CardContext, CardRejection};
use rs_placereviews::session::extract_snapshot;
use rs_placereviews::{dom, extract_reviews, Options, SelectorSource, ANONYMOUS_AUTHOR};

fn ctx() -> CardContext {
    CardContext {
        position: 3,
        observed_at: Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(),
    }
}

#[test]
fn search_embedded_review_shape() {
    let html = r#"
        <div class="gws-localreviews__google-review">
            <div class="TSUbDb"><a href="/maps/contrib/7">Priya N.</a></div>
            <div class="reviewer-info">Local Guide · 1,204 reviews</div>
            <span class="review-score">4/5</span>
            <span class="dehysf">3 months ago</span>
            <span class="review-full-text">Friendly staff and quick service even at lunch.</span>
        </div>
        <div class="gws-localreviews__google-review">
            <div class="TSUbDb">Tom</div>
            <span class="review-score">2 out of 5</span>
        </div>"#;

    let reviews = extract_reviews(html, &Options::default());

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].author_name, "Priya N.");
    assert_eq!(reviews[0].rating, 4);
    assert_eq!(reviews[0].author_review_count, Some(1204));
    assert!(reviews[0].author_is_trusted_reviewer);
    assert_eq!(
        reviews[0].body_text.as_deref(),
        Some("Friendly staff and quick service even at lunch.")
    );
    assert_eq!(reviews[1].rating, 2);
    assert!(reviews[1].body_text.is_none());
    assert!(!reviews[1].identity.stable);
}

#[test]
fn schema_org_review_shape() {
    let html = r#"
        <ul>
          <li itemprop="review">
            <span itemprop="author">Mo</span>
            <span class="star-filled"></span><span class="star-filled"></span><span class="star-filled"></span>
            <span class="star-empty"></span><span class="star-empty"></span>
            <time itemprop="datePublished">a year ago</time>
            <p itemprop="reviewBody">Decent.</p>
          </li>
        </ul>"#;

    let reviews = extract_reviews(html, &Options::default());

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].rating, 3);
    assert_eq!(reviews[0].author_name, "Mo");
    assert_eq!(reviews[0].body_text.as_deref(), Some("Decent."));
}

#[test]
fn structural_fallback_for_unknown_markup() {
    let html = r#"
        <body>
          <div class="Xk2pLq">
            <div class="zz91"><b>Ada</b><span aria-label="5 stars"></span>
              <p>Best bakery in the district, hands down, no contest.</p><i>2 days ago</i></div>
            <div class="zz91"><b>Lin</b><span aria-label="1 star"></span>
              <i>an hour ago</i></div>
          </div>
        </body>"#;

    let reference = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
    let (reviews, report) = extract_snapshot(html, &Options::default(), "", reference);

    let selector = report.selector.unwrap();
    assert_eq!(selector.css, "div.zz91");
    assert_eq!(selector.source, SelectorSource::Structural);
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].rating, 5);
    assert_eq!(
        reviews[0].body_text.as_deref(),
        Some("Best bakery in the district, hands down, no contest.")
    );
    assert_eq!(
        reviews[0].published_at_timestamp,
        Utc.with_ymd_and_hms(2024, 3, 30, 0, 0, 0).unwrap()
    );
    assert_eq!(reviews[1].rating, 1);
    assert_eq!(
        reviews[1].published_at_timestamp,
        Utc.with_ymd_and_hms(2024, 3, 31, 23, 0, 0).unwrap()
    );
}

#[test]
fn owner_response_fields_only_from_response_block() {
    let doc = dom::parse(
        r#"<div class="jftiEf" data-review-id="own">
             <span aria-label="2 stars"></span>
             <span class="rsqaWe">5 days ago</span>
             <span class="wiI7pd">Cold food and a long wait for the bill.</span>
             <div class="owner-response">
               <span>Response from the owner</span>
               <span>4 days ago</span>
               <span>We are sorry to hear this and have spoken with the kitchen team.</span>
             </div>
           </div>"#,
    );

    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();

    assert_eq!(record.published_relative_text, "5 days ago");
    assert_eq!(record.body_text.as_deref(), Some("Cold food and a long wait for the bill."));
    assert_eq!(
        record.owner_response_text.as_deref(),
        Some("We are sorry to hear this and have spoken with the kitchen team.")
    );
    assert_eq!(record.owner_response_relative_text.as_deref(), Some("4 days ago"));
}

#[test]
fn no_response_block_means_no_response_fields() {
    let doc = dom::parse(
        r#"<div class="jftiEf"><span aria-label="5 stars"></span>
             <span class="wiI7pd">Response times were excellent 2 days ago.</span></div>"#,
    );

    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();
    assert!(record.owner_response_text.is_none());
    assert!(record.owner_response_relative_text.is_none());
}

#[test]
fn detailed_ratings_omitted_when_no_rows() {
    let doc = dom::parse(r#"<div class="jftiEf"><span aria-label="4 stars"></span></div>"#);
    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();
    assert!(record.detailed_ratings.is_none());
}

#[test]
fn detailed_ratings_from_labelled_rows() {
    let doc = dom::parse(
        r#"<div class="jftiEf"><span class="kvMYJc" aria-label="4 stars"></span>
             <div class="detailed-rating"><span class="detail-label">Food</span><span aria-label="5 stars"></span></div>
             <div class="detailed-rating"><span class="detail-label">Atmosphere</span><span aria-label="3 stars"></span></div>
             <div class="detailed-rating"><span class="detail-label">Parking</span></div>
           </div>"#,
    );

    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();
    let ratings = record.detailed_ratings.unwrap();

    assert_eq!(record.rating, 4);
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings["Food"], 5);
    assert_eq!(ratings["Atmosphere"], 3);
}

#[test]
fn defaults_for_rating_only_card() {
    let doc = dom::parse(r#"<div class="jftiEf"><span aria-label="3 stars"></span></div>"#);
    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();

    assert_eq!(record.author_name, ANONYMOUS_AUTHOR);
    assert_eq!(record.published_relative_text, "");
    assert!(record.body_text.is_none());
    assert_eq!(record.like_count, 0);
    assert!(record.author_review_count.is_none());
    assert!(!record.author_is_trusted_reviewer);
    assert_eq!(record.identity.value, "synthetic-3-1707555600000");
    assert!(!record.identity.stable);
}

#[test]
fn rating_only_local_guide_review_has_no_body() {
    let doc = dom::parse(
        r#"<div class="jftiEf" data-review-id="lg">
             <div class="d4r55">Noor</div>
             <div class="RfnDt">Local Guide · 88 reviews · 120 photos</div>
             <span class="kvMYJc" aria-label="4 stars"></span>
             <span class="rsqaWe">2 weeks ago</span>
           </div>"#,
    );

    let record = extract_card(&doc.select("div.jftiEf"), &ctx()).unwrap();

    assert!(record.body_text.is_none());
    assert_eq!(record.author_review_count, Some(88));
    assert!(record.author_is_trusted_reviewer);
    assert_eq!(record.published_relative_text, "2 weeks ago");
}

#[test]
fn out_of_range_ratings_are_invalid() {
    let doc = dom::parse(
        r#"<div class="a"><span aria-label="7 stars"></span>Some words here</div>
           <div class="b"><span aria-label="0 stars"></span>Some words here</div>"#,
    );

    assert_eq!(extract_card(&doc.select("div.a"), &ctx()), Err(CardRejection::Invalid));
    assert_eq!(extract_card(&doc.select("div.b"), &ctx()), Err(CardRejection::Invalid));
}

#[test]
fn chains_report_winning_link() {
    let doc = dom::parse(
        r#"<div class="c"><a href="/u">Kim</a><span role="img" aria-label="4 stars"></span>
             <p>Pleasant spot for an afternoon coffee and cake.</p></div>"#,
    );
    let card = fields::card_scope(&doc.select("div.c"));

    assert_eq!(fields::AUTHOR_NAME.resolve(&card).unwrap().link, "first-link");
    assert_eq!(fields::RATING.resolve(&card).unwrap().link, "star-label");
    assert_eq!(fields::BODY_TEXT.resolve(&card).unwrap().link, "longest-fragment");
}
