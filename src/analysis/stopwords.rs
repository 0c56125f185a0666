//! Built-in word lists, stored in accent-folded lowercase form.
//!
//! Only words of four characters or more are listed; anything shorter is
//! dropped by the tokenizer before the stopword check.

/// French function words and high-frequency fillers with no vocabulary value.
pub const FRENCH_STOPWORDS: &[&str] = &[
    "alors", "apres", "assez", "aucun", "aucune", "aujourd'hui", "aupres", "auquel", "aussi",
    "autant", "autre", "autres", "avaient", "avais", "avait", "avant", "avec", "avez", "aviez",
    "avions", "avoir", "avons", "ayant", "beaucoup", "bien", "cela", "celle", "celles", "celui",
    "cependant", "certain", "certaine", "certaines", "certains", "ceux", "chaque", "chez",
    "comme", "comment", "contre", "dans", "depuis", "desormais", "dessous", "dessus", "devant",
    "donc", "dont", "duquel", "durant", "elle", "elles", "encore", "enfin", "entre", "envers",
    "etaient", "etais", "etait", "etant", "etre", "eues", "eurent", "fait", "faire", "fois",
    "font", "hors", "jamais", "jusque", "leur", "leurs", "lors", "lorsque",
    "lui-meme", "mais", "malgre", "meme", "memes", "moins", "mien", "mienne", "mode", "nous",
    "notre", "parce", "parmi", "pendant", "peut", "peuvent", "plus",
    "plusieurs", "pour", "pourquoi", "pourtant", "puis", "puisque", "quand", "quel", "quelle",
    "quelles", "quels", "quelque", "quelques", "quoi", "sans", "selon", "sera", "serait",
    "seront", "sien", "sienne", "sinon", "sont", "sous", "souvent", "suis", "surtout", "tandis",
    "tant", "tels", "telle", "telles", "tien", "tienne", "toujours", "tous", "tout", "toute",
    "toutes", "tres", "trop", "vers", "voici", "voila", "vont", "votre", "vous", "vraiment",
];

/// Words that only ever reach article text as parsing artifacts.
pub const JUNK_WORDS: &[&str] = &[
    "abonne", "abonnes", "abonnez", "abonnement", "cliquez", "cookie", "cookies", "copyright",
    "facebook", "html", "http", "https", "inscrivez", "instagram", "javascript", "linkedin",
    "newsletter", "publicite", "twitter", "whatsapp",
];
