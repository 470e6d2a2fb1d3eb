use shared::domain::{Product, ProductId, QuickReply, QuickReplyId, Sender, TastingNotes};

use crate::SeedMessage;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn notes(category: &str, items: &[&str]) -> TastingNotes {
    TastingNotes {
        category: category.to_string(),
        notes: strings(items),
    }
}

pub(crate) fn products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId(1),
            name: "Château Margaux 2015".into(),
            winery: "Château Margaux".into(),
            region: "Margaux, Bordeaux, France".into(),
            vintage: 2015,
            price_cents: 89_999,
            rating: 4.8,
            review_count: 127,
            images: strings(&[
                "https://manager.chateau-margaux.com/wp-content/uploads/2017/11/chr_2017_11_13_hp-2-652x458.jpg",
                "https://keyassets.timeincuk.net/inspirewp/live/wp-content/uploads/sites/34/2017/11/margaux-2015-limited-release.jpg",
                "https://www.lagunacellar.com/media/catalog/product/m/a/margaux-2015x6.jpg",
            ]),
            in_stock: true,
            stock_count: Some(12),
            description: "A magnificent expression of the 2015 vintage from one of Bordeaux's most prestigious estates. This wine showcases the perfect balance of power and elegance that Château Margaux is renowned for.".into(),
            tasting_notes: vec![
                notes("Aroma", &["Blackcurrant", "Violet", "Cedar", "Graphite", "Tobacco"]),
                notes(
                    "Palate",
                    &["Rich dark fruits", "Silky tannins", "Mineral notes", "Long finish"],
                ),
                notes("Body", &["Full-bodied", "Well-structured", "Age-worthy"]),
            ],
            pairings: strings(&[
                "Grilled ribeye steak",
                "Lamb rack",
                "Aged cheeses",
                "Beef Wellington",
            ]),
            expert_review: Some("This is a stunning wine that captures the essence of the 2015 vintage. Showing remarkable depth and complexity, with layers of dark fruit, floral notes, and classic Margaux elegance. The tannins are refined and the finish is incredibly long. While approachable now, this wine will continue to develop beautifully over the next 20-30 years.".into()),
            provenance: Some("Sourced directly from the château, stored in temperature-controlled facilities since release. Complete provenance documentation available.".into()),
            badges: strings(&["95+ Points", "Critic's Choice", "Limited Allocation"]),
            varietal: "Bordeaux Blend (Cabernet Sauvignon, Merlot, Petit Verdot)".into(),
            alcohol_content: 13.5,
            bottle_size: "750ml".into(),
        },
        Product {
            id: ProductId(2),
            name: "Penfolds Grange 2018".into(),
            winery: "Penfolds".into(),
            region: "Barossa Valley, Australia".into(),
            vintage: 2018,
            price_cents: 74_999,
            rating: 4.7,
            review_count: 89,
            images: strings(&[
                "https://lieblings-weine.de/wp-content/uploads/2024/10/penfolds_bin_95_grange_2018_m_schubert_gepa_bottle_lieblings-weine.jpg",
            ]),
            in_stock: true,
            stock_count: Some(8),
            description: "Australia's most iconic wine, the Grange is a testament to Penfolds' winemaking excellence.".into(),
            tasting_notes: vec![notes("Aroma", &["Blackberry", "Plum", "Mocha", "Spice"])],
            pairings: strings(&["Braised short ribs", "Venison"]),
            expert_review: None,
            provenance: None,
            badges: strings(&["97 Points"]),
            varietal: "Shiraz".into(),
            alcohol_content: 14.5,
            bottle_size: "750ml".into(),
        },
        Product {
            id: ProductId(3),
            name: "Opus One 2018".into(),
            winery: "Opus One".into(),
            region: "Napa Valley, California".into(),
            vintage: 2018,
            price_cents: 44_999,
            rating: 4.6,
            review_count: 156,
            images: strings(&["https://winescout.com.sg/cdn/shop/files/OPUSONE2.jpg"]),
            in_stock: true,
            stock_count: None,
            description: "A Napa Valley icon, blending Bordeaux tradition with California innovation."
                .into(),
            tasting_notes: vec![notes("Palate", &["Blackberry", "Cassis", "Vanilla"])],
            pairings: strings(&["Prime rib", "Duck confit"]),
            expert_review: None,
            provenance: None,
            badges: strings(&["94 Points"]),
            varietal: "Bordeaux Blend".into(),
            alcohol_content: 14.5,
            bottle_size: "750ml".into(),
        },
        Product {
            id: ProductId(4),
            name: "Sassicaia 2017".into(),
            winery: "Tenuta San Guido".into(),
            region: "Bolgheri, Tuscany, Italy".into(),
            vintage: 2017,
            price_cents: 34_999,
            rating: 4.7,
            review_count: 92,
            images: strings(&["https://www.terredimare.com/wp-content/uploads/2021/04/DSC00003-scaled.jpg"]),
            in_stock: true,
            stock_count: None,
            description: "The wine that started the Super Tuscan revolution.".into(),
            tasting_notes: vec![notes("Aroma", &["Cassis", "Herbs", "Mediterranean scrub"])],
            pairings: strings(&["Tuscan steak", "Wild boar"]),
            expert_review: None,
            provenance: None,
            badges: strings(&["96 Points", "Super Tuscan"]),
            varietal: "Cabernet Sauvignon".into(),
            alcohol_content: 13.5,
            bottle_size: "750ml".into(),
        },
    ]
}

pub(crate) fn quick_replies() -> Vec<QuickReply> {
    [
        (1, "Tell me more"),
        (2, "View details"),
        (3, "Other options?"),
        (4, "What food pairs well?"),
    ]
    .into_iter()
    .map(|(id, text)| QuickReply {
        id: QuickReplyId(id),
        text: text.to_string(),
    })
    .collect()
}

pub(crate) fn seed_conversation() -> Vec<SeedMessage> {
    let seed = |sender, age_secs, text: &str| SeedMessage {
        text: text.to_string(),
        sender,
        age_secs,
        product_reference: None,
    };

    vec![
        seed(
            Sender::Assistant,
            300,
            "Hello! I'm your wine assistant. How can I help you find the perfect wine today?",
        ),
        seed(
            Sender::User,
            240,
            "I'm looking for a special Bordeaux for a dinner party",
        ),
        seed(
            Sender::Assistant,
            180,
            "Great choice! I have some excellent Bordeaux options for you. What's your budget range and what will you be serving?",
        ),
        seed(Sender::User, 120, "Around $800-1000, serving beef Wellington"),
        SeedMessage {
            product_reference: Some(ProductId(1)),
            ..seed(
                Sender::Assistant,
                60,
                "Perfect! I recommend the Château Margaux 2015. It's a stunning wine that pairs beautifully with beef Wellington. The wine has exceptional depth, silky tannins, and the 2015 vintage is considered one of the best in recent years.",
            )
        },
    ]
}
