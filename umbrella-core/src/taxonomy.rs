/// Security categories the probe reports on. Labels outside this set are
/// still counted in the total but get no counter of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
  CommandAndControl,
  Cryptomining,
  DnsTunnelingVpn,
  DynamicDns,
  Malware,
  NewlySeenDomains,
  Phishing,
  PotentiallyHarmful,
  UnauthorizedIpTunnelAccess,
}

struct Entry {
  category: Category,
  label: &'static str,
  metric: &'static str,
}

static TAXONOMY: [Entry; Category::COUNT] = [
  Entry { category: Category::CommandAndControl, label: "Command and Control", metric: "command-and-control" },
  Entry { category: Category::Cryptomining, label: "Cryptomining", metric: "cryptomining" },
  Entry { category: Category::DnsTunnelingVpn, label: "DNS Tunneling VPN", metric: "dns-tunneling-vpn" },
  Entry { category: Category::DynamicDns, label: "Dynamic DNS", metric: "dynamic-dns" },
  Entry { category: Category::Malware, label: "Malware", metric: "malware" },
  Entry { category: Category::NewlySeenDomains, label: "Newly Seen Domains", metric: "newly-seen-domains" },
  Entry { category: Category::Phishing, label: "Phishing", metric: "phishing" },
  Entry { category: Category::PotentiallyHarmful, label: "Potentially Harmful", metric: "potentially-harmful" },
  Entry {
    category: Category::UnauthorizedIpTunnelAccess,
    label: "Unauthorized IP Tunnel Access",
    metric: "unauthorized-ip-tunnel-access",
  },
];

impl Category {
  pub const COUNT: usize = 9;

  /// All categories in reporting order.
  pub fn all() -> impl Iterator<Item = Category> {
    TAXONOMY.iter().map(|e| e.category)
  }

  /// Exact, case-sensitive lookup of an API label.
  pub fn from_label(label: &str) -> Option<Category> {
    TAXONOMY.iter().find(|e| e.label == label).map(|e| e.category)
  }

  pub fn label(self) -> &'static str {
    self.entry().label
  }

  pub fn metric_name(self) -> &'static str {
    self.entry().metric
  }

  fn entry(self) -> &'static Entry {
    // TAXONOMY is declared in enum order.
    &TAXONOMY[self as usize]
  }
}
