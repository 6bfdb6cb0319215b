//! RPL_ISUPPORT negotiation.
//!
//! The server advertises its limits and options as `KEY[=VALUE]` tokens,
//! possibly over several 005 replies and possibly again later in the
//! session. [`ISupport::apply_tokens`] folds each batch of tokens into the
//! current state; `-KEY` puts a key back to its default.

use crate::casemap::CaseMapping;

const DEFAULT_CHANTYPES: &str = "#&";
const DEFAULT_EXCEPTS: &str = "e";
const DEFAULT_INVEX: &str = "I";

/// Membership prefixes assumed when the server does not send `PREFIX`.
const FALLBACK_PREFIXES: &str = "@+";

/// Capability set negotiated with the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ISupport {
    pub awaylen: usize,
    pub casemapping: String,
    pub chanlimit: String,
    pub chanmodes: String,
    pub channellen: usize,
    pub chantypes: String,
    pub elist: String,
    pub excepts: String,
    pub extban: String,
    pub hostlen: usize,
    pub invex: String,
    pub kicklen: usize,
    pub maxlist: String,
    pub maxtargets: usize,
    pub modes: usize,
    pub network: String,
    pub nicklen: usize,
    pub prefix: String,
    pub safelist: bool,
    pub silence: usize,
    pub statusmsg: String,
    pub targmax: String,
    pub topiclen: usize,
    pub userlen: usize,
}

impl Default for ISupport {
    fn default() -> Self {
        ISupport {
            awaylen: 0,
            casemapping: String::new(),
            chanlimit: String::new(),
            chanmodes: String::new(),
            channellen: 0,
            chantypes: DEFAULT_CHANTYPES.to_string(),
            elist: String::new(),
            excepts: DEFAULT_EXCEPTS.to_string(),
            extban: String::new(),
            hostlen: 0,
            invex: DEFAULT_INVEX.to_string(),
            kicklen: 0,
            maxlist: String::new(),
            maxtargets: 0,
            modes: 0,
            network: String::new(),
            nicklen: 0,
            prefix: String::new(),
            safelist: false,
            silence: 0,
            statusmsg: String::new(),
            targmax: String::new(),
            topiclen: 0,
            userlen: 0,
        }
    }
}

fn number(value: Option<&str>) -> usize {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn text(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

impl ISupport {
    /// Apply the tokens of one 005 reply, in order.
    ///
    /// `tokens` excludes the target nick and the trailing
    /// "are supported by this server" text.
    pub fn apply_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) {
        for token in tokens {
            self.apply_token(token.as_ref());
        }
    }

    /// Apply a single token. Unknown keys are ignored.
    pub fn apply_token(&mut self, token: &str) {
        let (negated, token) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (token, None),
        };
        // `-KEY` and a bare `KEY` both mean "the default value".
        let value = if negated { None } else { value };

        match key.to_ascii_uppercase().as_str() {
            "AWAYLEN" => self.awaylen = number(value),
            "CASEMAPPING" => self.casemapping = text(value, ""),
            "CHANLIMIT" => self.chanlimit = text(value, ""),
            "CHANMODES" => self.chanmodes = text(value, ""),
            "CHANNELLEN" => self.channellen = number(value),
            "CHANTYPES" => self.chantypes = text(value, DEFAULT_CHANTYPES),
            "ELIST" => self.elist = text(value, ""),
            "EXCEPTS" => self.excepts = text(value, DEFAULT_EXCEPTS),
            "EXTBAN" => self.extban = text(value, ""),
            "HOSTLEN" => self.hostlen = number(value),
            "INVEX" => self.invex = text(value, DEFAULT_INVEX),
            "KICKLEN" => self.kicklen = number(value),
            "MAXLIST" => self.maxlist = text(value, ""),
            "MAXTARGETS" => self.maxtargets = number(value),
            "MODES" => self.modes = number(value),
            "NETWORK" => self.network = text(value, ""),
            "NICKLEN" => self.nicklen = number(value),
            "PREFIX" => self.prefix = text(value, ""),
            "SAFELIST" => self.safelist = !negated,
            "SILENCE" => self.silence = number(value),
            "STATUSMSG" => self.statusmsg = text(value, ""),
            "TARGMAX" => self.targmax = text(value, ""),
            "TOPICLEN" => self.topiclen = number(value),
            "USERLEN" => self.userlen = number(value),
            _ => {}
        }
    }

    /// How the server compares names.
    pub fn case_mapping(&self) -> CaseMapping {
        CaseMapping::from_isupport(&self.casemapping)
    }

    /// True when `name` starts with one of the advertised channel types.
    pub fn is_channel_name(&self, name: &str) -> bool {
        name.chars()
            .next()
            .map_or(false, |c| self.chantypes.contains(c))
    }

    /// Symbols that may precede a nick in a NAMES reply (`@`, `+`, ...).
    pub fn membership_prefixes(&self) -> &str {
        match self.prefix_spec() {
            Some(spec) => spec.prefixes,
            None => FALLBACK_PREFIXES,
        }
    }

    /// Parsed `PREFIX`.
    pub fn prefix_spec(&self) -> Option<PrefixSpec<'_>> {
        PrefixSpec::parse(&self.prefix)
    }

    /// Parsed `CHANMODES`.
    pub fn chanmodes_spec(&self) -> Option<ChanModes<'_>> {
        ChanModes::parse(&self.chanmodes)
    }

    /// Parsed `TARGMAX`.
    pub fn targmax_spec(&self) -> TargMax<'_> {
        TargMax::parse(&self.targmax)
    }

    /// Parsed `MAXLIST`.
    pub fn maxlist_spec(&self) -> MaxList {
        MaxList::parse(&self.maxlist)
    }
}

/// `PREFIX=(ov)@+`: mode letters and their display symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixSpec<'a> {
    pub modes: &'a str,
    pub prefixes: &'a str,
}

impl<'a> PrefixSpec<'a> {
    pub fn parse(s: &'a str) -> Option<Self> {
        let rest = s.strip_prefix('(')?;
        let (modes, prefixes) = rest.split_once(')')?;
        if modes.is_empty() || prefixes.is_empty() {
            return None;
        }
        Some(PrefixSpec { modes, prefixes })
    }

    /// Symbol for a mode letter, e.g. `o` -> `@`.
    pub fn symbol_for(&self, mode: char) -> Option<char> {
        let index = self.modes.chars().position(|m| m == mode)?;
        self.prefixes.chars().nth(index)
    }
}

/// `CHANMODES=A,B,C,D`: list, always-parameter, set-parameter and flag modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChanModes<'a> {
    pub a: &'a str,
    pub b: &'a str,
    pub c: &'a str,
    pub d: &'a str,
}

impl<'a> ChanModes<'a> {
    pub fn parse(s: &'a str) -> Option<Self> {
        let mut parts = s.splitn(4, ',');
        let (a, b, c, d) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        Some(ChanModes { a, b, c, d })
    }
}

/// `TARGMAX=PRIVMSG:4,NOTICE:4,JOIN:`: per-command target limits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargMax<'a> {
    entries: Vec<(&'a str, Option<usize>)>,
}

impl<'a> TargMax<'a> {
    pub fn parse(s: &'a str) -> Self {
        let entries = s
            .split(',')
            .filter(|part| !part.is_empty())
            .filter_map(|part| match part.split_once(':') {
                Some(("", _)) => None,
                Some((cmd, num)) => Some((cmd, num.parse().ok())),
                None => Some((part, None)),
            })
            .collect();
        TargMax { entries }
    }

    /// `Some(None)` means the command is listed without a limit.
    pub fn get(&self, cmd: &str) -> Option<Option<usize>> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(cmd))
            .map(|(_, v)| *v)
    }
}

/// `MAXLIST=beI:100`: list mode entry limits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaxList {
    entries: Vec<(char, usize)>,
}

impl MaxList {
    pub fn parse(s: &str) -> Self {
        let mut entries: Vec<(char, usize)> = Vec::new();
        for (modes, limit) in s.split(',').filter_map(|part| part.split_once(':')) {
            let Ok(limit) = limit.parse::<usize>() else { continue };
            for ch in modes.chars() {
                entries.retain(|(c, _)| *c != ch);
                entries.push((ch, limit));
            }
        }
        MaxList { entries }
    }

    pub fn limit_for(&self, mode: char) -> Option<usize> {
        self.entries.iter().find(|(c, _)| *c == mode).map(|(_, n)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let isupport = ISupport::default();
        assert_eq!(isupport.chantypes, "#&");
        assert_eq!(isupport.excepts, "e");
        assert_eq!(isupport.invex, "I");
        assert_eq!(isupport.nicklen, 0);
        assert!(!isupport.safelist);
    }

    #[test]
    fn test_remove_resets_to_compiled_default() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&["CHANTYPES=#", "NICKLEN=30"]);
        assert_eq!(isupport.chantypes, "#");
        assert_eq!(isupport.nicklen, 30);

        isupport.apply_tokens(&["-CHANTYPES"]);
        assert_eq!(isupport.chantypes, "#&");
        assert_eq!(isupport.nicklen, 30);
    }

    #[test]
    fn test_remove_excepts_and_invex() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&["EXCEPTS=x", "INVEX=y", "TOPICLEN=300"]);
        isupport.apply_tokens(&["-EXCEPTS", "-INVEX", "-TOPICLEN"]);
        assert_eq!(isupport.excepts, "e");
        assert_eq!(isupport.invex, "I");
        assert_eq!(isupport.topiclen, 0);
    }

    #[test]
    fn test_later_token_wins_and_unknown_ignored() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&["NICKLEN=9", "FOOBAR=1", "NICKLEN=16", "WHOX"]);
        assert_eq!(isupport.nicklen, 16);
        assert_eq!(isupport, ISupport { nicklen: 16, ..ISupport::default() });
    }

    #[test]
    fn test_bare_keys() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&["SAFELIST", "EXCEPTS", "NETWORK=Libera.Chat"]);
        assert!(isupport.safelist);
        assert_eq!(isupport.excepts, "e");
        assert_eq!(isupport.network, "Libera.Chat");

        isupport.apply_tokens(&["-SAFELIST", "-NETWORK"]);
        assert!(!isupport.safelist);
        assert_eq!(isupport.network, "");
    }

    #[test]
    fn test_bad_number_is_zero() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&["NICKLEN=30", "NICKLEN=lots"]);
        assert_eq!(isupport.nicklen, 0);
    }

    #[test]
    fn test_prefix_spec() {
        let mut isupport = ISupport::default();
        assert_eq!(isupport.membership_prefixes(), "@+");

        isupport.apply_tokens(&["PREFIX=(qaohv)~&@%+"]);
        let spec = isupport.prefix_spec().unwrap();
        assert_eq!(spec.modes, "qaohv");
        assert_eq!(spec.symbol_for('o'), Some('@'));
        assert_eq!(isupport.membership_prefixes(), "~&@%+");
        assert!(PrefixSpec::parse("@+").is_none());
    }

    #[test]
    fn test_chanmodes_targmax_maxlist() {
        let mut isupport = ISupport::default();
        isupport.apply_tokens(&[
            "CHANMODES=beI,k,l,imnpst",
            "TARGMAX=PRIVMSG:4,JOIN:",
            "MAXLIST=bq:100,e:50",
        ]);

        let modes = isupport.chanmodes_spec().unwrap();
        assert_eq!(modes.a, "beI");
        assert_eq!(modes.d, "imnpst");

        let targmax = isupport.targmax_spec();
        assert_eq!(targmax.get("privmsg"), Some(Some(4)));
        assert_eq!(targmax.get("JOIN"), Some(None));
        assert_eq!(targmax.get("KICK"), None);

        let maxlist = isupport.maxlist_spec();
        assert_eq!(maxlist.limit_for('q'), Some(100));
        assert_eq!(maxlist.limit_for('e'), Some(50));
        assert_eq!(maxlist.limit_for('I'), None);
    }

    #[test]
    fn test_channel_names_and_casemapping() {
        let mut isupport = ISupport::default();
        assert!(isupport.is_channel_name("#rust"));
        assert!(isupport.is_channel_name("&local"));
        assert!(!isupport.is_channel_name("nick"));
        assert_eq!(isupport.case_mapping(), CaseMapping::Exact);

        isupport.apply_tokens(&["CASEMAPPING=rfc1459"]);
        assert_eq!(isupport.case_mapping(), CaseMapping::Rfc1459);
    }
}
