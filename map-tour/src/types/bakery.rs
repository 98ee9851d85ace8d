use walkers::Position;

/// A stop on the crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub number: u32,
    pub recommendation: &'static str,
    pub link: &'static str,
}

impl PointOfInterest {
    pub fn position(&self) -> Position {
        Position::from_lat_lon(self.lat, self.lon)
    }
}

/// The crawl, in visiting order.
pub const BAKERIES: [PointOfInterest; 7] = [
    PointOfInterest {
        name: "FORNO",
        lat: 51.5346029,
        lon: -0.0577733,
        number: 1,
        recommendation: "Try their signature maritozzo and the indulgent milk chocolate & sea salt praline bun",
        link: "https://www.google.com/maps/place/FORNO/@51.5346062,-0.0603482,17z",
    },
    PointOfInterest {
        name: "Ozone Coffee - London Fields",
        lat: 51.532553,
        lon: -0.0611383,
        number: 2,
        recommendation: "Specialty coffee and our first coffee break of the day",
        link: "https://www.google.com/maps/place/Ozone+Coffee+-+London+Fields/@51.5348725,-0.0610221,16.5z",
    },
    PointOfInterest {
        name: "Specialty Cafetiere",
        lat: 51.5317801,
        lon: -0.0629956,
        number: 3,
        recommendation: "Another specialty coffee spot with some burrata-mortadella-pistachio croissants",
        link: "https://maps.app.goo.gl/manVHquGMKK9Crii6",
    },
    PointOfInterest {
        name: "Pophams London Fields",
        lat: 51.5436252,
        lon: -0.0575894,
        number: 4,
        recommendation: "They do weekly special bakes - worth asking for what's new this week! They're working with Smokestack UK to bring some savoury BBQ pastries and toasties",
        link: "https://maps.app.goo.gl/443HKgpEFfqRKNeE6",
    },
    PointOfInterest {
        name: "Violet Cakes",
        lat: 51.5454834,
        lon: -0.0640996,
        number: 5,
        recommendation: "Famous for their banana bread, kimchi and blue cheese toastie, and chocolate cupcakes",
        link: "https://www.google.com/maps/place/Violet+Cakes/@51.5454867,-0.0666745,17z",
    },
    PointOfInterest {
        name: "The Dusty Knuckle Bakery",
        lat: 51.5470859,
        lon: -0.074094,
        number: 6,
        recommendation: "Everything! We will be hoping to try their sandwiches this weekend",
        link: "https://maps.app.goo.gl/N3VvRxKkjc4N2Jp5A",
    },
    PointOfInterest {
        name: "Toconoco",
        lat: 51.5383498,
        lon: -0.0783027,
        number: 7,
        recommendation: "Final spot of the day, known for their matcha lattes, bento boxes and cakes",
        link: "https://maps.app.goo.gl/Bh9pppQov4vLCf9h6",
    },
];
